use blocky_world::{
    Camera, CameraController, Command, VoxelMap,
    camera::{CameraUniform, MIN_ASPECT},
    cgmath::{Point3, Transform},
};
use winit::{
    event::{ElementState, MouseButton},
    keyboard::KeyCode,
};

use crate::common::test_utils::{assert_approx, assert_point_eq};

mod common;

/// A 3×3 map with a two-block column in the middle.
fn walled_map() -> VoxelMap {
    let mut map = VoxelMap::new(3);
    map.set(1, 1, 2);
    map
}

fn camera_facing_wall() -> Camera {
    Camera::new(Point3::new(0.5, 0.5, 1.5), Point3::new(0.5, 0.5, -10.0))
}

#[test]
fn forward_then_backward_returns_to_start() {
    let mut camera = Camera::default();
    let start = camera;
    assert!(camera.move_forward(1.0, None));
    assert_point_eq(camera.eye, Point3::new(0.0, 0.5, 2.0));
    assert!(camera.move_backward(1.0, None));
    assert_point_eq(camera.eye, start.eye);
    assert_point_eq(camera.at, start.at);
}

#[test]
fn strafing_is_perpendicular_to_the_view() {
    let mut camera = Camera::default();
    assert!(camera.move_right(1.0, None));
    assert_point_eq(camera.eye, Point3::new(1.0, 0.5, 3.0));
    assert!(camera.move_left(2.0, None));
    assert_point_eq(camera.eye, Point3::new(-1.0, 0.5, 3.0));
}

#[test]
fn walking_ignores_pitch() {
    let mut camera = Camera::default();
    camera.tilt(45.0);
    camera.move_forward(1.0, None);
    assert_approx(camera.eye.y, 0.5);
    assert_approx(camera.eye.z, 2.0);
}

#[test]
fn pan_left_then_right_restores_the_view() {
    let mut camera = Camera::default();
    let start = camera.direction();
    camera.pan_left(90.0);
    let d = camera.direction();
    assert_approx(d.x, -1.0);
    assert_approx(d.z, 0.0);
    camera.pan_right(90.0);
    let d = camera.direction();
    assert_approx(d.x, start.x);
    assert_approx(d.z, start.z);

    camera.pan_left(37.0);
    camera.pan_left(-37.0);
    let d = camera.direction();
    assert_approx(d.x, start.x);
    assert_approx(d.z, start.z);
}

#[test]
fn tilt_is_clamped() {
    let mut camera = Camera::default();
    camera.tilt(30.0);
    assert_approx(camera.pitch(), 30.0);
    camera.tilt(100.0);
    assert_approx(camera.pitch(), 89.0);
    camera.tilt(-500.0);
    assert_approx(camera.pitch(), -89.0);
    // Still able to walk since the view never becomes vertical.
    assert!(camera.move_forward(0.1, None));
}

#[test]
fn vertical_view_cannot_walk() {
    let mut camera = Camera::new(Point3::new(0.0, 0.5, 0.0), Point3::new(0.0, 5.0, 0.0));
    assert!(!camera.move_forward(1.0, None));
    assert!(!camera.move_left(1.0, None));
    assert_point_eq(camera.eye, Point3::new(0.0, 0.5, 0.0));
}

#[test]
fn can_move_to_checks_cells() {
    let map = walled_map();
    assert!(Camera::can_move_to(0.5, 1.5, &map));
    assert!(Camera::can_move_to(-1.0, -1.0, &map));
    assert!(!Camera::can_move_to(0.5, 0.5, &map));
    assert!(!Camera::can_move_to(0.0, 0.999, &map));
    assert!(!Camera::can_move_to(2.0, 0.0, &map));
    assert!(!Camera::can_move_to(0.0, -1.01, &map));
}

#[test]
fn collision_rejects_the_whole_move() {
    let map = walled_map();
    let mut camera = camera_facing_wall();
    let start = camera;

    assert!(!camera.move_forward(0.6, Some(&map)));
    assert_eq!(camera, start);

    assert!(camera.move_forward(0.4, Some(&map)));
    assert_approx(camera.eye.z, 1.1);

    // The far edge of the grid is just as solid.
    let mut camera = start;
    assert!(!camera.move_backward(0.6, Some(&map)));
    assert_eq!(camera, start);

    // Without a map nothing blocks.
    assert!(camera.move_forward(0.6, None));
}

#[test]
fn far_away_coordinates_are_off_the_grid() {
    let map = VoxelMap::new(32);
    assert!(!Camera::can_move_to(3.0e9, 0.0, &map));
    assert!(!Camera::can_move_to(0.0, -3.0e9, &map));
    assert!(!Camera::can_move_to(f32::INFINITY, 0.0, &map));
    assert!(!Camera::can_move_to(f32::NAN, 0.0, &map));
    assert_eq!(Camera::default().target_cell(1.0e12, &map), None);

    let mut camera = Camera::default();
    assert!(!camera.move_forward(1.0e10, Some(&map)));
    assert_eq!(camera, Camera::default());
}

#[test]
fn target_cell_follows_the_view() {
    let map = VoxelMap::new(32);
    let camera = Camera::default();
    assert_eq!(camera.target_cell(3.0, &map), Some((16, 16)));
    assert_eq!(camera.target_cell(100.0, &map), None);
}

#[test]
fn view_matrix_moves_the_eye_to_the_origin() {
    let camera = Camera::default();
    let view = camera.view_matrix();
    assert_point_eq(view.transform_point(camera.eye), Point3::new(0.0, 0.0, 0.0));
    let ahead = view.transform_point(Point3::new(0.0, 0.5, 0.0));
    assert!(ahead.z < 0.0);
}

#[test]
fn degenerate_aspect_still_projects() {
    let camera = Camera::default();
    for aspect in [0.0, -1.0, f32::NAN] {
        let projection = camera.projection_matrix(aspect);
        assert_eq!(projection, camera.projection_matrix(MIN_ASPECT));
        let cols: [[f32; 4]; 4] = projection.into();
        assert!(cols.iter().flatten().all(|v| v.is_finite()), "{:?}", cols);
    }

    let mut uniform = CameraUniform::default();
    uniform.update_view_proj(&camera, 0.0);
    assert!(uniform.view_proj.iter().flatten().all(|v| v.is_finite()));
}

#[test]
fn uniform_tracks_the_eye() {
    let mut uniform = CameraUniform::default();
    uniform.update_view_proj(&Camera::default(), 1.5);
    assert_eq!(uniform.view_position, [0.0, 0.5, 3.0, 1.0]);
    assert_ne!(uniform.view_proj, CameraUniform::new().view_proj);
}

#[test]
fn held_keys_repeat_until_released() {
    let mut controller = CameraController::new(0.1, 2.0);
    assert!(controller.process_key(KeyCode::KeyW, ElementState::Pressed));
    assert!(controller.process_key(KeyCode::KeyQ, ElementState::Pressed));
    assert!(!controller.process_key(KeyCode::KeyZ, ElementState::Pressed));

    let expected = vec![Command::MoveForward(0.1), Command::PanLeft(2.0)];
    assert_eq!(controller.commands(), expected);
    assert_eq!(controller.commands(), expected);

    controller.process_key(KeyCode::KeyW, ElementState::Released);
    controller.process_key(KeyCode::KeyQ, ElementState::Released);
    assert!(controller.commands().is_empty());
}

#[test]
fn drag_only_counts_while_left_button_is_held() {
    let mut controller = CameraController::new(0.1, 2.0);
    controller.handle_mouse(5.0, 5.0);
    assert!(controller.commands().is_empty());

    controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
    controller.handle_mouse(3.0, 1.0);
    controller.handle_mouse(1.0, -2.0);
    assert_eq!(controller.commands(), vec![Command::Drag { dx: 4.0, dy: -1.0 }]);
    assert!(controller.commands().is_empty());

    controller.process_mouse_button(MouseButton::Left, ElementState::Released);
    controller.handle_mouse(3.0, 1.0);
    assert!(controller.commands().is_empty());
}

#[test]
fn clicks_edit_blocks_and_poke() {
    let mut controller = CameraController::new(0.1, 2.0);
    controller.process_key(KeyCode::KeyD, ElementState::Pressed);
    controller.process_mouse_button(MouseButton::Right, ElementState::Pressed);
    controller.process_mouse_button(MouseButton::Right, ElementState::Released);

    controller.process_key(KeyCode::ShiftLeft, ElementState::Pressed);
    controller.process_mouse_button(MouseButton::Right, ElementState::Pressed);
    controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);

    assert_eq!(
        controller.commands(),
        vec![
            Command::MoveRight(0.1),
            Command::PlaceBlock,
            Command::RemoveBlock,
            Command::Poke,
        ]
    );
    assert_eq!(controller.commands(), vec![Command::MoveRight(0.1)]);
}
