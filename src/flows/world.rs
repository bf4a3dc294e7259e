//! The explorable voxel world.
//!
//! The player walks a maze with a collision-checked first-person camera,
//! raises and lowers blocks in front of them, and looks for a small rat hidden
//! in a random open cell. All state lives in [`WorldFlow`]; nothing is global.

use cgmath::Vector3;
use instant::Duration;
use log::{debug, info, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    camera::Camera,
    context::Context,
    data_structures::{
        animation::Animation,
        block::VoxelMap,
        rat::{Scurry, compact_rat},
        scene_graph::{ArticulatedModel, MeshKind},
        terrain::GeometryBatcher,
        transform::RigidTransform,
    },
    error::RigResult,
    flow::{Command, GraphicsFlow, Out},
    render::{Batched, DrawCall, Frame, Render, TextureSelector},
};

pub const SKY_COLOR: [f32; 4] = [0.5, 0.7, 1.0, 1.0];
/// Shown wherever the ground texture is unavailable.
pub const GROUND_COLOR: [f32; 4] = [0.3, 0.6, 0.3, 1.0];
pub const GROUND_TEXTURE: TextureSelector = TextureSelector::Unit(0);
pub const WALL_TEXTURE: TextureSelector = TextureSelector::Unit(1);

/// Height the rat's body floats above the floor.
const RAT_HEIGHT: f32 = 0.15;
const RAT_SCALE: f32 = 0.5;
/// Degrees per second the hidden rat spins so it is easier to spot.
const RAT_SPIN: f32 = 30.0;
const RAT_PLACEMENT_ATTEMPTS: usize = 100;

pub struct WorldFlow {
    camera: Camera,
    map: VoxelMap,
    batcher: GeometryBatcher,
    rat: ArticulatedModel,
    rat_position: (f32, f32),
    rat_found: bool,
    seconds: f32,
    rng: StdRng,
    custom_map: bool,
}

impl WorldFlow {
    pub fn new() -> RigResult<Self> {
        Ok(Self {
            camera: Camera::default(),
            map: VoxelMap::default(),
            batcher: GeometryBatcher::new(),
            rat: compact_rat()?,
            rat_position: (0.0, 0.0),
            rat_found: false,
            seconds: 0.0,
            rng: StdRng::from_entropy(),
            custom_map: false,
        })
    }

    /// Uses `map` instead of generating the maze at init.
    pub fn with_map(mut self, map: VoxelMap) -> Self {
        self.map = map;
        self.custom_map = true;
        self
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn map(&self) -> &VoxelMap {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut VoxelMap {
        &mut self.map
    }

    pub fn batcher(&self) -> &GeometryBatcher {
        &self.batcher
    }

    pub fn rat(&self) -> &ArticulatedModel {
        &self.rat
    }

    /// World `(x, z)` of the hidden rat.
    pub fn rat_position(&self) -> (f32, f32) {
        self.rat_position
    }

    pub fn set_rat_position(&mut self, x: f32, z: f32) {
        self.rat_position = (x, z);
        self.rat_found = false;
    }

    pub fn is_rat_found(&self) -> bool {
        self.rat_found
    }

    pub fn seconds(&self) -> f32 {
        self.seconds
    }

    /// Picks a random open cell away from the border; falls back to the world origin.
    fn place_rat(&mut self) {
        let n = self.map.size() as i32;
        if n >= 3 {
            for _ in 0..RAT_PLACEMENT_ATTEMPTS {
                let x = self.rng.gen_range(1..n - 1);
                let z = self.rng.gen_range(1..n - 1);
                if self.map.is_open(x, z) {
                    self.rat_position = self.map.cell_to_world(x, z);
                    info!(
                        "Rat hidden at grid ({}, {}), world {:?}",
                        x, z, self.rat_position
                    );
                    return;
                }
            }
        }
        warn!("No open cell found for the rat, placing it at the origin");
        self.rat_position = (0.0, 0.0);
    }

    fn edit_block(&mut self, ctx: &Context, place: bool) {
        let Some((x, z)) = self.camera.target_cell(ctx.reach, &self.map) else {
            debug!("No grid cell within reach");
            return;
        };
        let changed = if place {
            self.map.raise(x, z)
        } else {
            self.map.lower(x, z)
        };
        debug!(
            "{} block at ({}, {}): {}",
            if place { "Place" } else { "Remove" },
            x,
            z,
            if changed { "done" } else { "no change" }
        );
    }

    fn check_rat(&mut self, ctx: &Context) {
        if self.rat_found {
            return;
        }
        let (x, z) = self.rat_position;
        if self.camera.ground_distance(x, z) < ctx.touch_distance {
            self.rat_found = true;
            info!("You found the rat!");
        }
    }

    fn pose_rat(&mut self) {
        let (x, z) = self.rat_position;
        self.rat.apply_pose(&Scurry.sample(self.seconds));
        self.rat.set_placement(
            RigidTransform::from_translation(x, RAT_HEIGHT, z)
                .scale(RAT_SCALE, RAT_SCALE, RAT_SCALE)
                .rotate(self.seconds * RAT_SPIN, Vector3::unit_y()),
        );
        self.rat.update_world_transforms();
    }

    fn sky(&self) -> DrawCall {
        DrawCall {
            transform: RigidTransform::from_translation(0.0, 10.0, 0.0).scale(200.0, 200.0, 200.0),
            mesh: MeshKind::Cube,
            color: SKY_COLOR,
            texture: TextureSelector::SolidColor,
        }
    }

    fn ground(&self) -> DrawCall {
        let n = self.map.size() as f32;
        DrawCall {
            transform: RigidTransform::from_translation(0.0, -0.5, 0.0).scale(n, 0.1, n),
            mesh: MeshKind::Cube,
            color: GROUND_COLOR,
            texture: GROUND_TEXTURE,
        }
    }
}

impl GraphicsFlow for WorldFlow {
    fn on_init(&mut self, ctx: &mut Context) -> Out {
        if !self.custom_map {
            self.map = VoxelMap::maze(ctx.grid_size).with_max_height(ctx.max_height);
        }
        self.camera = Camera::from_context(ctx);
        if let Some(seed) = ctx.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.place_rat();
        self.batcher.rebuild_if_dirty(&mut self.map);
        self.pose_rat();
        Out::Empty
    }

    fn on_command(&mut self, ctx: &Context, command: Command) -> Out {
        match command {
            Command::MoveForward(speed) => {
                let map = ctx.collision.then_some(&self.map);
                self.camera.move_forward(speed, map);
            }
            Command::MoveBackward(speed) => {
                let map = ctx.collision.then_some(&self.map);
                self.camera.move_backward(speed, map);
            }
            Command::MoveLeft(speed) => {
                let map = ctx.collision.then_some(&self.map);
                self.camera.move_left(speed, map);
            }
            Command::MoveRight(speed) => {
                let map = ctx.collision.then_some(&self.map);
                self.camera.move_right(speed, map);
            }
            Command::PanLeft(degrees) => self.camera.pan_left(degrees),
            Command::PanRight(degrees) => self.camera.pan_right(degrees),
            Command::Tilt(degrees) => self.camera.tilt(degrees),
            Command::Drag { dx, dy } => {
                self.camera.pan_left(-dx * ctx.mouse_sensitivity);
                self.camera.tilt(-dy * ctx.mouse_sensitivity);
            }
            Command::PlaceBlock => self.edit_block(ctx, true),
            Command::RemoveBlock => self.edit_block(ctx, false),
            Command::SetCollision(on) => {
                return Out::Configure(Box::new(move |ctx| ctx.collision = on));
            }
            Command::Poke | Command::SetAnimated(_) => (),
        }
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, dt: Duration) -> Out {
        self.seconds += dt.as_secs_f32();
        self.check_rat(ctx);
        self.batcher.rebuild_if_dirty(&mut self.map);
        if !self.rat_found {
            self.pose_rat();
        }
        Out::Empty
    }

    fn on_tick(&mut self, _ctx: &Context) -> Out {
        let eye = self.camera.eye;
        debug!(
            "Eye at ({:.2}, {:.2}, {:.2}), {} blocks",
            eye.x,
            eye.y,
            eye.z,
            self.map.block_count()
        );
        Out::Empty
    }

    fn on_render(&self, ctx: &Context, aspect: f32) -> Frame<'_> {
        let mut renders = vec![
            Render::Default(self.sky()),
            Render::Default(self.ground()),
            Render::Terrain(Batched::new(self.batcher.geometry(), WALL_TEXTURE)),
        ];
        if !self.rat_found {
            renders.push(Render::Defaults(self.rat.get_render()));
        }
        Frame {
            view: RigidTransform::from(self.camera.view_matrix()).to_cols_array(),
            projection: RigidTransform::from(self.camera.projection_matrix(aspect))
                .to_cols_array(),
            clear_colour: ctx.clear_rgba(),
            render: Render::Composed(renders),
        }
    }
}
