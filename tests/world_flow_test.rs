use blocky_world::{
    Command, Context, FlowRunner, VoxelMap,
    flows::world::{GROUND_COLOR, GROUND_TEXTURE, WorldFlow},
};

use crate::common::test_utils::FRAME;

mod common;

fn world(seed: u64) -> FlowRunner<WorldFlow> {
    let ctx = Context::default().with_seed(seed);
    FlowRunner::new(ctx, WorldFlow::new().expect("rat builds"))
}

/// An open 32×32 floor with the camera at its default start.
fn open_world() -> FlowRunner<WorldFlow> {
    let flow = WorldFlow::new()
        .expect("rat builds")
        .with_map(VoxelMap::new(32));
    FlowRunner::new(Context::default().with_seed(1), flow)
}

#[test]
fn init_builds_the_maze_geometry() {
    let runner = world(3);
    let flow = runner.flow();
    assert!(flow.map().columns().eq(VoxelMap::maze(32).columns()));
    assert!(!flow.map().is_dirty());
    assert_eq!(flow.batcher().rebuilds(), 1);
    assert_eq!(
        flow.batcher().vertex_count(),
        flow.map().block_count() as usize * 36
    );
}

#[test]
fn grid_size_comes_from_the_context() {
    let ctx = Context::default().with_grid_size(16).with_seed(0);
    let runner = FlowRunner::new(ctx, WorldFlow::new().expect("rat builds"));
    assert_eq!(runner.flow().map().size(), 16);
}

#[test]
fn max_height_comes_from_the_context() {
    let ctx = Context::default().with_max_height(1).with_seed(0);
    let mut runner = FlowRunner::new(ctx, WorldFlow::new().expect("rat builds"));
    assert_eq!(runner.flow().map().max_height(), 1);
    assert_eq!(runner.flow().map().height(0, 0), Some(1));

    // Default eye (0, 0.5, 3) reaches the open cell (16, 16).
    runner.step(FRAME, &[Command::PlaceBlock, Command::PlaceBlock]);
    assert_eq!(runner.flow().map().height(16, 16), Some(1));
}

#[test]
fn rat_hides_in_an_open_cell() {
    for seed in 0..20 {
        let runner = world(seed);
        let flow = runner.flow();
        let (x, z) = flow.rat_position();
        let (cx, cz) = flow.map().world_to_cell(x, z).expect("rat on the grid");
        assert!(flow.map().is_open(cx, cz), "seed {} put the rat in a wall", seed);
        assert!(!flow.is_rat_found());
    }
}

#[test]
fn same_seed_same_hiding_place() {
    assert_eq!(world(42).flow().rat_position(), world(42).flow().rat_position());
}

#[test]
fn walking_up_to_the_rat_finds_it() {
    let mut runner = world(5);
    let eye = runner.flow().camera().eye;
    runner.flow_mut().set_rat_position(eye.x, eye.z - 1.0);
    runner.step(FRAME, &[]);
    assert!(!runner.flow().is_rat_found());
    assert_eq!(runner.render(1.0).render.draw_count(), 3 + 12);

    for _ in 0..5 {
        runner.step(FRAME, &[Command::MoveForward(0.1)]);
    }
    assert!(runner.flow().is_rat_found());
    assert_eq!(runner.render(1.0).render.draw_count(), 3);
}

#[test]
fn place_and_remove_edit_the_cell_in_reach() {
    let mut runner = open_world();
    // Default eye (0, 0.5, 3) looking down -Z: three units ahead is cell (16, 16).
    runner.step(FRAME, &[Command::PlaceBlock, Command::PlaceBlock]);
    assert_eq!(runner.flow().map().height(16, 16), Some(2));
    assert_eq!(runner.flow().batcher().rebuilds(), 2);
    assert_eq!(runner.flow().batcher().vertex_count(), 72);

    runner.step(FRAME, &[Command::RemoveBlock]);
    assert_eq!(runner.flow().map().height(16, 16), Some(1));
    assert_eq!(runner.flow().batcher().rebuilds(), 3);

    // Nothing changed, nothing rebuilt.
    runner.step(FRAME, &[]);
    assert_eq!(runner.flow().batcher().rebuilds(), 3);
}

#[test]
fn walls_block_movement_until_collision_is_off() {
    let mut runner = open_world();
    runner.flow_mut().map_mut().set(16, 18, 1);
    let start = runner.flow().camera().eye;

    runner.step(FRAME, &[Command::MoveForward(0.1)]);
    assert_eq!(runner.flow().camera().eye, start);

    runner.step(FRAME, &[Command::SetCollision(false), Command::MoveForward(0.1)]);
    assert!(!runner.ctx().collision);
    assert!(runner.flow().camera().eye.z < start.z);
}

#[test]
fn drag_turns_the_camera() {
    let mut runner = open_world();
    runner.step(FRAME, &[Command::Drag { dx: 50.0, dy: 0.0 }]);
    assert!(runner.flow().camera().direction().x > 0.1);

    runner.step(FRAME, &[Command::Drag { dx: 0.0, dy: -50.0 }]);
    assert!(runner.flow().camera().pitch() > 5.0);
}

#[test]
fn frame_carries_camera_matrices() {
    let runner = world(9);
    let frame = runner.render(16.0 / 9.0);
    let expected = runner.flow().camera().view_matrix();
    assert_eq!(frame.view[12..15], [expected.w.x, expected.w.y, expected.w.z]);
    assert_ne!(frame.projection, [0.0; 16]);
    assert_eq!(frame.clear_colour, [0.5, 0.7, 1.0, 1.0]);
}

#[test]
fn ground_slab_keeps_its_colour_under_the_texture() {
    let runner = world(2);
    let mut calls = Vec::new();
    let mut terrain = Vec::new();
    runner.render(1.0).render.collect(&mut calls, &mut terrain);
    let ground = calls
        .iter()
        .find(|call| call.texture == GROUND_TEXTURE)
        .expect("ground is drawn");
    assert_eq!(ground.color, GROUND_COLOR);
    assert_eq!(terrain.len(), 1);
}

#[test]
fn minimised_window_still_renders() {
    let runner = world(4);
    let frame = runner.render(0.0);
    assert!(frame.projection.iter().all(|v| v.is_finite()));
}
