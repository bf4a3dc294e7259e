//! The articulated-animal viewer.
//!
//! Shows the full rat on its own. In manual mode three sliders drive the
//! front-left leg's hip, knee and ankle; in animated mode the whole rat walks.
//! A global rotation (slider plus mouse drag) turns the model, and a poke makes
//! it hop and spin once.

use cgmath::Vector3;
use instant::Duration;
use log::warn;

use crate::{
    context::Context,
    data_structures::{
        animation::{Animation, JointMode, PokeAnimation},
        rat::{self, Walk, full_rat, manual_pose},
        scene_graph::ArticulatedModel,
        transform::RigidTransform,
    },
    error::RigResult,
    flow::{Command, GraphicsFlow, Out},
    render::{Frame, Render},
};

/// Degrees of model rotation per pixel of drag.
pub const DRAG_DEGREES_PER_PIXEL: f32 = 0.5;
pub const MAX_DRAG_PITCH: f32 = 90.0;
pub const VIEWER_CLEAR_COLOUR: [f32; 3] = [0.2, 0.3, 0.4];

/// Indices accepted by [`AnimalFlow::set_slider`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slider {
    GlobalRotation = 0,
    UpperLeg = 1,
    LowerLeg = 2,
    Foot = 3,
}

impl Slider {
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Slider::GlobalRotation),
            1 => Some(Slider::UpperLeg),
            2 => Some(Slider::LowerLeg),
            3 => Some(Slider::Foot),
            _ => None,
        }
    }
}

pub struct AnimalFlow {
    rat: ArticulatedModel,
    global_rotation: f32,
    leg_angles: [f32; 3],
    drag_yaw: f32,
    drag_pitch: f32,
    poke: PokeAnimation,
    spin: f32,
    seconds: f32,
}

impl AnimalFlow {
    pub fn new() -> RigResult<Self> {
        let mut flow = Self {
            rat: full_rat()?,
            global_rotation: 0.0,
            leg_angles: [0.0; 3],
            drag_yaw: 0.0,
            drag_pitch: 0.0,
            poke: PokeAnimation::default(),
            spin: 0.0,
            seconds: 0.0,
        };
        flow.pose();
        Ok(flow)
    }

    pub fn rat(&self) -> &ArticulatedModel {
        &self.rat
    }

    pub fn mode(&self) -> JointMode {
        self.rat.mode()
    }

    pub fn set_mode(&mut self, mode: JointMode) {
        self.rat.set_mode(mode);
    }

    pub fn set_global_rotation(&mut self, degrees: f32) {
        self.global_rotation = degrees;
    }

    /// Hip, knee and ankle of the front-left leg, used in manual mode.
    pub fn set_leg_angles(&mut self, upper: f32, lower: f32, foot: f32) {
        self.leg_angles = [upper, lower, foot];
    }

    /// Sets a slider by index. Returns `false` for an index with no slider.
    pub fn set_slider(&mut self, index: usize, value: f32) -> bool {
        match Slider::from_index(index) {
            Some(Slider::GlobalRotation) => self.global_rotation = value,
            Some(Slider::UpperLeg) => self.leg_angles[0] = value,
            Some(Slider::LowerLeg) => self.leg_angles[1] = value,
            Some(Slider::Foot) => self.leg_angles[2] = value,
            None => {
                warn!("There is no slider with index {}", index);
                return false;
            }
        }
        true
    }

    /// Turns the model by a mouse drag; the pitch stays within ±90°.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.drag_yaw += dx * DRAG_DEGREES_PER_PIXEL;
        self.drag_pitch =
            (self.drag_pitch + dy * DRAG_DEGREES_PER_PIXEL).clamp(-MAX_DRAG_PITCH, MAX_DRAG_PITCH);
    }

    /// `(pitch, yaw)` of the drag rotation in degrees.
    pub fn drag_rotation(&self) -> (f32, f32) {
        (self.drag_pitch, self.drag_yaw)
    }

    pub fn poke(&mut self) {
        self.poke.start(self.seconds);
    }

    pub fn is_poking(&self) -> bool {
        self.poke.is_active(self.seconds)
    }

    pub fn seconds(&self) -> f32 {
        self.seconds
    }

    /// Rotation applied to the whole model: drag pitch, then yaw from drag and slider, then poke spin.
    pub fn global_transform(&self) -> RigidTransform {
        RigidTransform::identity()
            .rotate(self.drag_pitch, Vector3::unit_x())
            .rotate(self.drag_yaw + self.global_rotation, Vector3::unit_y())
            .rotate(self.spin, Vector3::unit_y())
    }

    fn pose(&mut self) {
        let [upper, lower, foot] = self.leg_angles;
        let mut pose = match self.rat.mode() {
            JointMode::Manual => manual_pose(upper, lower, foot),
            JointMode::Animated => Walk.sample(self.seconds),
        };
        self.spin = 0.0;
        if let Some(hop) = self.poke.sample(self.seconds) {
            pose.set(rat::BODY, rat::body_state(hop.jump_height));
            self.spin = hop.spin_degrees;
        }
        self.rat.apply_pose(&pose);
        self.rat.set_placement(self.global_transform());
        self.rat.update_world_transforms();
    }
}

impl GraphicsFlow for AnimalFlow {
    fn on_init(&mut self, ctx: &mut Context) -> Out {
        ctx.clear_colour = VIEWER_CLEAR_COLOUR;
        Out::Empty
    }

    fn on_command(&mut self, _ctx: &Context, command: Command) -> Out {
        match command {
            Command::Drag { dx, dy } => self.drag(dx, dy),
            Command::Poke => self.poke(),
            Command::SetAnimated(on) => self.set_mode(if on {
                JointMode::Animated
            } else {
                JointMode::Manual
            }),
            _ => (),
        }
        Out::Empty
    }

    fn on_update(&mut self, _ctx: &Context, dt: Duration) -> Out {
        self.seconds += dt.as_secs_f32();
        self.poke.update(self.seconds);
        self.pose();
        Out::Empty
    }

    fn on_tick(&mut self, _ctx: &Context) -> Out {
        Out::Empty
    }

    /// The viewer draws straight into clip space; the global rotation is its only camera.
    fn on_render(&self, ctx: &Context, _aspect: f32) -> Frame<'_> {
        let identity = RigidTransform::identity().to_cols_array();
        Frame {
            view: identity,
            projection: identity,
            clear_colour: ctx.clear_rgba(),
            render: Render::Defaults(self.rat.get_render()),
        }
    }
}
