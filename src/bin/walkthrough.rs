//! Drives the voxel world and the animal viewer headlessly for a scripted
//! sequence of frames and logs what happens.
//!
//! Usage: `walkthrough [seed]`. Run with `RUST_LOG=info` (or `debug`) to see the log.

use anyhow::Context as _;
use blocky_world::{
    Command, Context, FlowRunner,
    flow::init_logging,
    flows::{animal::AnimalFlow, world::WorldFlow},
};
use instant::Duration;

const FRAME: Duration = Duration::from_millis(16);

fn main() -> anyhow::Result<()> {
    init_logging();

    let seed = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<u64>())
        .transpose()
        .context("the seed must be an unsigned integer")?
        .unwrap_or(7);

    let ctx = Context::default().with_seed(seed).with_tick_duration_millis(500);
    let mut world = FlowRunner::new(ctx.clone(), WorldFlow::new()?);

    let script: Vec<(usize, Vec<Command>)> = vec![
        (40, vec![Command::MoveForward(ctx.move_speed)]),
        (20, vec![Command::PanLeft(ctx.pan_speed)]),
        (30, vec![Command::MoveForward(ctx.move_speed), Command::MoveRight(ctx.move_speed)]),
        (1, vec![Command::PlaceBlock]),
        (1, vec![Command::PlaceBlock]),
        (1, vec![Command::RemoveBlock]),
        (10, vec![Command::Drag { dx: 12.0, dy: -4.0 }]),
        (45, vec![Command::PanRight(ctx.pan_speed)]),
        (60, vec![Command::MoveForward(ctx.move_speed)]),
    ];
    for (frames, commands) in &script {
        for _ in 0..*frames {
            world.step(FRAME, commands);
        }
    }

    let flow = world.flow();
    let eye = flow.camera().eye;
    log::info!(
        "World: {} frames, eye ({:.2}, {:.2}, {:.2}), {} blocks, {} geometry rebuilds, rat at {:?}, found: {}",
        world.frames(),
        eye.x,
        eye.y,
        eye.z,
        flow.map().block_count(),
        flow.batcher().rebuilds(),
        flow.rat_position(),
        flow.is_rat_found()
    );
    let frame = world.render(16.0 / 9.0);
    log::info!("World frame needs {} draw calls", frame.render.draw_count());

    let mut viewer = FlowRunner::new(Context::default(), AnimalFlow::new()?);
    viewer.flow_mut().set_leg_angles(30.0, -10.0, 0.0);
    viewer.step(FRAME, &[]);
    viewer.step(FRAME, &[Command::SetAnimated(true), Command::Poke]);
    for _ in 0..120 {
        viewer.step(FRAME, &[Command::Drag { dx: 1.0, dy: 0.0 }]);
    }
    let rat = viewer.flow().rat();
    log::info!(
        "Viewer: {} segments, drag rotation {:?}, still poking: {}",
        rat.segment_count(),
        viewer.flow().drag_rotation(),
        viewer.flow().is_poking()
    );

    Ok(())
}
