//! First-person camera, its input controller and its GPU uniform.
//!
//! The [`Camera`] is stored as an eye point and a look-at point. Walking is
//! projected onto the ground plane and checked against the voxel map before it
//! is committed, so the eye never ends up inside a solid column.

use cgmath::{InnerSpace, Matrix4, Point3, SquareMatrix, Vector3};
use log::debug;
use winit::{
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::{
    context::Context,
    data_structures::{block::VoxelMap, transform::RigidTransform},
    flow::Command,
};

/// Maps OpenGL clip space (z in -1..1) onto wgpu's (z in 0..1).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Smallest aspect ratio handed to the projection.
pub const MIN_ASPECT: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub at: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub znear: f32,
    pub zfar: f32,
    pub pitch_limit: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Point3::new(0.0, 0.5, 3.0),
            at: Point3::new(0.0, 0.5, -100.0),
            up: Vector3::unit_y(),
            fov: 60.0,
            znear: 0.1,
            zfar: 1000.0,
            pitch_limit: 89.0,
        }
    }
}

impl Camera {
    pub fn new(eye: Point3<f32>, at: Point3<f32>) -> Self {
        Self {
            eye,
            at,
            ..Default::default()
        }
    }

    /// A camera at the default start position with lens and pitch limit taken from `ctx`.
    pub fn from_context(ctx: &Context) -> Self {
        Self {
            fov: ctx.fov,
            znear: ctx.znear,
            zfar: ctx.zfar,
            pitch_limit: ctx.pitch_limit,
            ..Default::default()
        }
    }

    /// Unit view direction.
    pub fn direction(&self) -> Vector3<f32> {
        (self.at - self.eye).normalize()
    }

    /// Unit view direction with Y dropped; `None` while looking straight up or down.
    fn ground_forward(&self) -> Option<Vector3<f32>> {
        let d = self.at - self.eye;
        let flat = Vector3::new(d.x, 0.0, d.z);
        (flat.magnitude2() > f32::EPSILON).then(|| flat.normalize())
    }

    fn right(&self) -> Option<Vector3<f32>> {
        self.ground_forward().map(|f| f.cross(self.up).normalize())
    }

    /**
     * Whether the eye may stand at world `(x, z)`.
     *
     * The cell is `floor(coord) + N/2` on each axis. Cells outside the grid
     * are rejected; inside, only height-0 columns are passable.
     */
    pub fn can_move_to(x: f32, z: f32, map: &VoxelMap) -> bool {
        map.world_to_cell(x, z)
            .is_some_and(|(cx, cz)| map.is_open(cx, cz))
    }

    /// Shifts eye and look-at together. With a map the move is all or nothing.
    fn try_move(&mut self, delta: Vector3<f32>, map: Option<&VoxelMap>) -> bool {
        let candidate = self.eye + delta;
        if let Some(map) = map {
            if !Self::can_move_to(candidate.x, candidate.z, map) {
                debug!(
                    "Move to ({:.2}, {:.2}) blocked",
                    candidate.x, candidate.z
                );
                return false;
            }
        }
        self.eye = candidate;
        self.at += delta;
        true
    }

    pub fn move_forward(&mut self, speed: f32, map: Option<&VoxelMap>) -> bool {
        match self.ground_forward() {
            Some(forward) => self.try_move(forward * speed, map),
            None => false,
        }
    }

    pub fn move_backward(&mut self, speed: f32, map: Option<&VoxelMap>) -> bool {
        match self.ground_forward() {
            Some(forward) => self.try_move(-forward * speed, map),
            None => false,
        }
    }

    pub fn move_left(&mut self, speed: f32, map: Option<&VoxelMap>) -> bool {
        match self.right() {
            Some(right) => self.try_move(-right * speed, map),
            None => false,
        }
    }

    pub fn move_right(&mut self, speed: f32, map: Option<&VoxelMap>) -> bool {
        match self.right() {
            Some(right) => self.try_move(right * speed, map),
            None => false,
        }
    }

    fn rotate_view(&mut self, degrees: f32, axis: Vector3<f32>) {
        let d = self.at - self.eye;
        let rotated = RigidTransform::identity()
            .rotate(degrees, axis)
            .transform_vector(d);
        self.at = self.eye + rotated;
    }

    /// Turns the view direction about `up`.
    pub fn pan_left(&mut self, degrees: f32) {
        self.rotate_view(degrees, self.up);
    }

    pub fn pan_right(&mut self, degrees: f32) {
        self.pan_left(-degrees);
    }

    /// Elevation of the view direction above the ground plane, in degrees.
    pub fn pitch(&self) -> f32 {
        let d = self.direction();
        d.y.clamp(-1.0, 1.0).asin().to_degrees()
    }

    /**
     * Looks up (positive) or down about the camera's right axis.
     *
     * The resulting elevation is clamped to `±pitch_limit`, which also keeps
     * the view direction from ever lining up with `up`.
     */
    pub fn tilt(&mut self, degrees: f32) {
        let Some(right) = self.right() else {
            return;
        };
        let pitch = self.pitch();
        let target = (pitch + degrees).clamp(-self.pitch_limit, self.pitch_limit);
        let applied = target - pitch;
        if applied != 0.0 {
            self.rotate_view(applied, right);
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye, self.at, self.up)
    }

    /// OpenGL-style perspective projection.
    ///
    /// A degenerate aspect (zero, negative or NaN, e.g. from a minimised
    /// window) is raised to [`MIN_ASPECT`].
    pub fn projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        let aspect = aspect.max(MIN_ASPECT);
        cgmath::perspective(cgmath::Deg(self.fov), aspect, self.znear, self.zfar)
    }

    /// Grid cell `reach` units along the full 3D view direction, if it lies on the grid.
    pub fn target_cell(&self, reach: f32, map: &VoxelMap) -> Option<(i32, i32)> {
        let p = self.eye + self.direction() * reach;
        map.world_to_cell(p.x, p.z)
    }

    /// Horizontal distance from the eye to a world point.
    pub fn ground_distance(&self, x: f32, z: f32) -> f32 {
        let dx = self.eye.x - x;
        let dz = self.eye.z - z;
        (dx * dx + dz * dz).sqrt()
    }
}

/**
 * Turns raw window input into [`Command`]s.
 *
 * Movement and pan keys are remembered while held, so [`commands`](Self::commands)
 * emits their commands every frame until the key is released. Mouse drags and
 * clicks are buffered until the next call.
 */
#[derive(Clone, Debug, Default)]
pub struct CameraController {
    speed: f32,
    pan_speed: f32,
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    pan_left: bool,
    pan_right: bool,
    shift: bool,
    dragging: bool,
    last_cursor: Option<(f64, f64)>,
    drag: (f32, f32),
    clicks: Vec<Command>,
}

impl CameraController {
    pub fn new(speed: f32, pan_speed: f32) -> Self {
        Self {
            speed,
            pan_speed,
            ..Default::default()
        }
    }

    pub fn from_context(ctx: &Context) -> Self {
        Self::new(ctx.move_speed, ctx.pan_speed)
    }

    /// Returns whether the key is one the controller cares about.
    pub fn process_key(&mut self, key: KeyCode, state: ElementState) -> bool {
        let pressed = state.is_pressed();
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => self.forward = pressed,
            KeyCode::KeyS | KeyCode::ArrowDown => self.backward = pressed,
            KeyCode::KeyA | KeyCode::ArrowLeft => self.left = pressed,
            KeyCode::KeyD | KeyCode::ArrowRight => self.right = pressed,
            KeyCode::KeyQ => self.pan_left = pressed,
            KeyCode::KeyE => self.pan_right = pressed,
            KeyCode::ShiftLeft | KeyCode::ShiftRight => self.shift = pressed,
            _ => return false,
        }
        true
    }

    /// Left drag looks around, shift+left pokes, right places and shift+right removes.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match (button, state.is_pressed()) {
            (MouseButton::Left, true) if self.shift => self.clicks.push(Command::Poke),
            (MouseButton::Left, pressed) => {
                self.dragging = pressed;
                self.last_cursor = None;
            }
            (MouseButton::Right, true) if self.shift => self.clicks.push(Command::RemoveBlock),
            (MouseButton::Right, true) => self.clicks.push(Command::PlaceBlock),
            _ => (),
        }
    }

    /// Accumulates a drag delta in pixels. Ignored unless the left button is held.
    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        if self.dragging {
            self.drag.0 += dx as f32;
            self.drag.1 += dy as f32;
        }
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            } => {
                self.process_key(*key, *state);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift = modifiers.state().shift_key();
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.process_mouse_button(*button, *state);
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some((x, y)) = self.last_cursor {
                    self.handle_mouse(position.x - x, position.y - y);
                }
                self.last_cursor = self.dragging.then_some((position.x, position.y));
            }
            WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false) => {
                self.dragging = false;
                self.last_cursor = None;
            }
            _ => (),
        }
    }

    /// Commands for this frame: held keys first, then the drag, then buffered clicks.
    pub fn commands(&mut self) -> Vec<Command> {
        let mut out = Vec::new();
        let held = [
            (self.forward, Command::MoveForward(self.speed)),
            (self.backward, Command::MoveBackward(self.speed)),
            (self.left, Command::MoveLeft(self.speed)),
            (self.right, Command::MoveRight(self.speed)),
            (self.pan_left, Command::PanLeft(self.pan_speed)),
            (self.pan_right, Command::PanRight(self.pan_speed)),
        ];
        out.extend(held.into_iter().filter(|(on, _)| *on).map(|(_, c)| c));

        let (dx, dy) = std::mem::take(&mut self.drag);
        if dx != 0.0 || dy != 0.0 {
            out.push(Command::Drag { dx, dy });
        }
        out.append(&mut self.clicks);
        out
    }
}

/// View-projection matrix as uploaded to the camera uniform buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, aspect: f32) {
        self.view_position = camera.eye.to_homogeneous().into();
        self.view_proj =
            (OPENGL_TO_WGPU_MATRIX * camera.projection_matrix(aspect) * camera.view_matrix())
                .into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}
