//! Runtime configuration shared by every flow.
//!
//! A [`Context`] is created once, handed to each flow's `on_init` for
//! adjustment, and then lent read-only to every other lifecycle hook.

use crate::data_structures::block::{DEFAULT_GRID_SIZE, MAX_HEIGHT};

#[derive(Clone, Debug, PartialEq)]
pub struct Context {
    /// Side length of the voxel grid.
    pub grid_size: usize,
    /// Tallest column the generated maze allows blocks to be stacked to.
    pub max_height: u32,
    /// Distance moved per frame while a movement key is held.
    pub move_speed: f32,
    /// Degrees turned per frame while a pan key is held.
    pub pan_speed: f32,
    /// Degrees of look rotation per pixel of mouse drag.
    pub mouse_sensitivity: f32,
    pub fov: f32,
    pub znear: f32,
    pub zfar: f32,
    /// How far in front of the eye blocks are placed and removed.
    pub reach: f32,
    /// Horizontal distance at which the hidden rat counts as found.
    pub touch_distance: f32,
    pub clear_colour: [f32; 3],
    pub collision: bool,
    /// Maximum view elevation in degrees, up or down.
    pub pitch_limit: f32,
    pub tick_duration_millis: u64,
    /// Seed for the rat's hiding place; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            max_height: MAX_HEIGHT,
            move_speed: 0.1,
            pan_speed: 2.0,
            mouse_sensitivity: 0.2,
            fov: 60.0,
            znear: 0.1,
            zfar: 1000.0,
            reach: 3.0,
            touch_distance: 0.7,
            clear_colour: [0.5, 0.7, 1.0],
            collision: true,
            pitch_limit: 89.0,
            tick_duration_millis: 1000,
            seed: None,
        }
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_max_height(mut self, max_height: u32) -> Self {
        self.max_height = max_height;
        self
    }

    pub fn with_move_speed(mut self, move_speed: f32) -> Self {
        self.move_speed = move_speed;
        self
    }

    pub fn with_pan_speed(mut self, pan_speed: f32) -> Self {
        self.pan_speed = pan_speed;
        self
    }

    pub fn with_mouse_sensitivity(mut self, mouse_sensitivity: f32) -> Self {
        self.mouse_sensitivity = mouse_sensitivity;
        self
    }

    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    pub fn with_clip_planes(mut self, znear: f32, zfar: f32) -> Self {
        self.znear = znear;
        self.zfar = zfar;
        self
    }

    pub fn with_reach(mut self, reach: f32) -> Self {
        self.reach = reach;
        self
    }

    pub fn with_touch_distance(mut self, touch_distance: f32) -> Self {
        self.touch_distance = touch_distance;
        self
    }

    pub fn with_clear_colour(mut self, clear_colour: [f32; 3]) -> Self {
        self.clear_colour = clear_colour;
        self
    }

    pub fn with_collision(mut self, collision: bool) -> Self {
        self.collision = collision;
        self
    }

    pub fn with_pitch_limit(mut self, pitch_limit: f32) -> Self {
        self.pitch_limit = pitch_limit;
        self
    }

    pub fn with_tick_duration_millis(mut self, tick_duration_millis: u64) -> Self {
        self.tick_duration_millis = tick_duration_millis;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Clear colour with full alpha, as handed to the renderer.
    pub fn clear_rgba(&self) -> [f32; 4] {
        let [r, g, b] = self.clear_colour;
        [r, g, b, 1.0]
    }
}
