//! The rat, written down as segment tables.
//!
//! Two variants share one set of part names and colours:
//! - [`full_rat`]: three-segment legs and a three-segment cylinder tail, used by the animal viewer
//! - [`compact_rat`]: single-segment legs and no tail, hidden somewhere in the voxel world
//!
//! Gait, tail wave and head nod are phase-shifted [`Oscillator`]s, so every pose
//! is a pure function of elapsed seconds.

use std::f32::consts::PI;

use cgmath::Vector3;

use crate::{
    data_structures::{
        animation::{Animation, JointState, Oscillator, Pose},
        scene_graph::{ArticulatedModel, SegmentSpec},
        transform::RigidTransform,
    },
    error::RigResult,
};

pub const BODY: &str = "body";
pub const HEAD: &str = "head";
pub const SNOUT: &str = "snout";
pub const NOSE: &str = "nose";
pub const LEFT_EAR: &str = "left_ear";
pub const RIGHT_EAR: &str = "right_ear";
pub const LEFT_EYE: &str = "left_eye";
pub const RIGHT_EYE: &str = "right_eye";
pub const TAIL_BASE: &str = "tail_base";
pub const TAIL_MID: &str = "tail_mid";
pub const TAIL_TIP: &str = "tail_tip";

pub const BODY_COLOR: [f32; 4] = [0.5, 0.45, 0.4, 1.0];
pub const HEAD_COLOR: [f32; 4] = [0.55, 0.5, 0.45, 1.0];
pub const LEG_COLOR: [f32; 4] = [0.45, 0.4, 0.35, 1.0];
pub const FOOT_COLOR: [f32; 4] = [0.7, 0.55, 0.5, 1.0];
pub const TAIL_COLOR: [f32; 4] = [0.7, 0.55, 0.5, 1.0];
pub const EAR_COLOR: [f32; 4] = [0.75, 0.6, 0.55, 1.0];
pub const SNOUT_COLOR: [f32; 4] = [0.6, 0.55, 0.5, 1.0];
pub const EYE_COLOR: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
pub const NOSE_COLOR: [f32; 4] = [0.2, 0.15, 0.15, 1.0];

pub const UPPER_LEG_LENGTH: f32 = 0.12;
pub const LOWER_LEG_LENGTH: f32 = 0.10;
pub const TAIL_SEGMENT_LENGTH: f32 = 0.15;
pub const TAIL_RADIUS: f32 = 0.03;

/// Leg swing in degrees. Opposite corners share a phase, the other pair runs π behind.
pub const GAIT: Oscillator = Oscillator::new(30.0, 6.0, 0.0);
/// A travelling wave down the tail: each segment swings wider and later than its parent.
pub const TAIL_WAVE: [Oscillator; 3] = [
    Oscillator::new(15.0, 6.0, 0.0),
    Oscillator::new(20.0, 6.0, -0.5),
    Oscillator::new(25.0, 6.0, -1.0),
];
pub const HEAD_NOD: Oscillator = Oscillator::new(5.0, 3.0, 0.0);
pub const BODY_BOB: Oscillator = Oscillator::new(0.02, 6.0, 0.0);

/// Lower leg angle that keeps the knee bent while the upper leg swings.
pub fn knee_angle(swing: f32) -> f32 {
    (-swing * 0.5 + 20.0).max(0.0)
}

pub fn ankle_angle(swing: f32) -> f32 {
    swing * 0.3
}

/// The head rises slightly as it nods up.
pub fn head_state(nod: f32) -> JointState {
    JointState {
        angle: nod,
        displacement: Vector3::new(0.0, nod * 0.005, 0.0),
    }
}

/// Vertical offset of the body, e.g. the bob or a poke jump.
pub fn body_state(lift: f32) -> JointState {
    JointState::displaced(Vector3::new(0.0, lift, 0.0))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Leg {
    FrontLeft,
    FrontRight,
    BackLeft,
    BackRight,
}

impl Leg {
    pub const ALL: [Leg; 4] = [Leg::FrontLeft, Leg::FrontRight, Leg::BackLeft, Leg::BackRight];

    /// Hip position `(x, z)` on the body.
    pub fn hip(self) -> (f32, f32) {
        match self {
            Leg::FrontLeft => (-0.18, 0.2),
            Leg::FrontRight => (0.18, 0.2),
            Leg::BackLeft => (-0.18, -0.22),
            Leg::BackRight => (0.18, -0.22),
        }
    }

    pub fn gait_phase(self) -> f32 {
        match self {
            Leg::FrontLeft | Leg::BackRight => 0.0,
            Leg::FrontRight | Leg::BackLeft => PI,
        }
    }

    pub fn upper(self) -> &'static str {
        match self {
            Leg::FrontLeft => "front_left_upper",
            Leg::FrontRight => "front_right_upper",
            Leg::BackLeft => "back_left_upper",
            Leg::BackRight => "back_right_upper",
        }
    }

    pub fn lower(self) -> &'static str {
        match self {
            Leg::FrontLeft => "front_left_lower",
            Leg::FrontRight => "front_right_lower",
            Leg::BackLeft => "back_left_lower",
            Leg::BackRight => "back_right_lower",
        }
    }

    pub fn foot(self) -> &'static str {
        match self {
            Leg::FrontLeft => "front_left_foot",
            Leg::FrontRight => "front_right_foot",
            Leg::BackLeft => "back_left_foot",
            Leg::BackRight => "back_right_foot",
        }
    }
}

fn offset(x: f32, y: f32, z: f32) -> RigidTransform {
    RigidTransform::from_translation(x, y, z)
}

/// Body, head and face parts. Both variants start from these.
fn body_and_head() -> Vec<SegmentSpec> {
    let cube = "cube";
    vec![
        SegmentSpec::new(BODY, None, cube)
            .visual(RigidTransform::identity().scale(0.5, 0.3, 0.7))
            .color(BODY_COLOR),
        SegmentSpec::new(HEAD, Some(BODY), cube)
            .offset(offset(0.0, 0.08, 0.35))
            .visual(RigidTransform::identity().scale(0.28, 0.24, 0.28))
            .color(HEAD_COLOR),
        SegmentSpec::new(SNOUT, Some(HEAD), cube)
            .offset(offset(0.0, -0.02, 0.18))
            .visual(RigidTransform::identity().scale(0.14, 0.1, 0.12))
            .color(SNOUT_COLOR),
        SegmentSpec::new(NOSE, Some(HEAD), cube)
            .offset(offset(0.0, -0.02, 0.25))
            .visual(RigidTransform::identity().scale(0.06, 0.05, 0.04))
            .color(NOSE_COLOR),
        SegmentSpec::new(LEFT_EAR, Some(HEAD), cube)
            .offset(offset(-0.12, 0.12, 0.0))
            .visual(RigidTransform::identity().scale(0.08, 0.12, 0.04))
            .color(EAR_COLOR),
        SegmentSpec::new(RIGHT_EAR, Some(HEAD), cube)
            .offset(offset(0.12, 0.12, 0.0))
            .visual(RigidTransform::identity().scale(0.08, 0.12, 0.04))
            .color(EAR_COLOR),
        SegmentSpec::new(LEFT_EYE, Some(HEAD), cube)
            .offset(offset(-0.1, 0.04, 0.12))
            .visual(RigidTransform::identity().scale(0.05, 0.05, 0.05))
            .color(EYE_COLOR),
        SegmentSpec::new(RIGHT_EYE, Some(HEAD), cube)
            .offset(offset(0.1, 0.04, 0.12))
            .visual(RigidTransform::identity().scale(0.05, 0.05, 0.05))
            .color(EYE_COLOR),
    ]
}

fn upper_leg(leg: Leg) -> SegmentSpec {
    let (x, z) = leg.hip();
    SegmentSpec::new(leg.upper(), Some(BODY), "cube")
        .offset(offset(x, -0.12, z))
        .joint(Vector3::unit_x(), 0.0)
        .visual(
            RigidTransform::from_translation(0.0, -UPPER_LEG_LENGTH / 2.0, 0.0)
                .scale(0.07, UPPER_LEG_LENGTH, 0.07),
        )
        .color(LEG_COLOR)
}

/// Tail cylinders hang down their pivot and are turned to lie along the body axis.
fn tail_visual(radius: f32) -> RigidTransform {
    RigidTransform::from_translation(0.0, -TAIL_SEGMENT_LENGTH / 2.0, 0.0)
        .rotate(90.0, Vector3::unit_x())
        .scale(radius, TAIL_SEGMENT_LENGTH, radius)
}

/**
 * The full rat: 8 body/head parts, a 3-segment tail and 4 legs of 3 segments each.
 *
 * Every leg is a hip → knee → ankle chain rotating about X. Rotating an upper
 * leg carries its lower leg and foot along.
 */
pub fn full_rat() -> RigResult<ArticulatedModel> {
    let mut specs = body_and_head();

    specs.push(
        SegmentSpec::new(TAIL_BASE, Some(BODY), "cylinder")
            .offset(offset(0.0, 0.0, -0.35))
            .joint(Vector3::unit_y(), -30.0)
            .post_joint(RigidTransform::identity().rotate(-20.0, Vector3::unit_x()))
            .visual(tail_visual(TAIL_RADIUS))
            .color(TAIL_COLOR),
    );
    specs.push(
        SegmentSpec::new(TAIL_MID, Some(TAIL_BASE), "cylinder")
            .offset(offset(0.0, -TAIL_SEGMENT_LENGTH, 0.0))
            .joint(Vector3::unit_y(), 0.0)
            .visual(tail_visual(TAIL_RADIUS * 0.8))
            .color(TAIL_COLOR),
    );
    specs.push(
        SegmentSpec::new(TAIL_TIP, Some(TAIL_MID), "cylinder")
            .offset(offset(0.0, -TAIL_SEGMENT_LENGTH, 0.0))
            .joint(Vector3::unit_y(), 0.0)
            .visual(tail_visual(TAIL_RADIUS * 0.6))
            .color(TAIL_COLOR),
    );

    for leg in Leg::ALL {
        specs.push(upper_leg(leg));
        specs.push(
            SegmentSpec::new(leg.lower(), Some(leg.upper()), "cube")
                .offset(offset(0.0, -UPPER_LEG_LENGTH, 0.0))
                .visual(
                    RigidTransform::from_translation(0.0, -LOWER_LEG_LENGTH / 2.0, 0.0)
                        .scale(0.055, LOWER_LEG_LENGTH, 0.055),
                )
                .color(LEG_COLOR),
        );
        specs.push(
            SegmentSpec::new(leg.foot(), Some(leg.lower()), "cube")
                .offset(offset(0.0, -LOWER_LEG_LENGTH, 0.0))
                .visual(
                    RigidTransform::from_translation(0.0, -0.02, 0.02).scale(0.06, 0.04, 0.09),
                )
                .color(FOOT_COLOR),
        );
    }

    ArticulatedModel::from_specs(&specs)
}

/// Body, head, face and four single-segment legs.
pub fn compact_rat() -> RigResult<ArticulatedModel> {
    let mut specs = body_and_head();
    specs.extend(Leg::ALL.into_iter().map(upper_leg));
    ArticulatedModel::from_specs(&specs)
}

/// Front-left leg from the three controls, the others standing at `(0, 20, 0)`.
pub fn manual_pose(upper: f32, lower: f32, foot: f32) -> Pose {
    let mut pose = Pose::new();
    for leg in Leg::ALL {
        let (u, l, f) = match leg {
            Leg::FrontLeft => (upper, lower, foot),
            _ => (0.0, 20.0, 0.0),
        };
        pose.set(leg.upper(), JointState::angle(u));
        pose.set(leg.lower(), JointState::angle(l));
        pose.set(leg.foot(), JointState::angle(f));
    }
    pose.set(BODY, body_state(0.0))
        .set(HEAD, head_state(0.0))
        .set(TAIL_BASE, JointState::angle(0.0))
        .set(TAIL_MID, JointState::angle(0.0))
        .set(TAIL_TIP, JointState::angle(0.0));
    pose
}

/// Walk cycle of the full rat.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Walk;

impl Animation for Walk {
    fn sample(&self, seconds: f32) -> Pose {
        let mut pose = Pose::new();
        for leg in Leg::ALL {
            let swing = GAIT.shifted(leg.gait_phase()).sample(seconds);
            pose.set(leg.upper(), JointState::angle(swing));
            pose.set(leg.lower(), JointState::angle(knee_angle(swing)));
            pose.set(leg.foot(), JointState::angle(ankle_angle(swing)));
        }
        for (name, wave) in [TAIL_BASE, TAIL_MID, TAIL_TIP].into_iter().zip(TAIL_WAVE) {
            pose.set(name, JointState::angle(wave.sample(seconds)));
        }
        pose.set(BODY, body_state(BODY_BOB.sample(seconds)))
            .set(HEAD, head_state(HEAD_NOD.sample(seconds)));
        pose
    }
}

/// Walk cycle of the compact rat: the legs swing without knees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Scurry;

impl Animation for Scurry {
    fn sample(&self, seconds: f32) -> Pose {
        let mut pose = Pose::new();
        for leg in Leg::ALL {
            let swing = GAIT.shifted(leg.gait_phase()).sample(seconds);
            pose.set(leg.upper(), JointState::angle(swing));
        }
        pose.set(BODY, body_state(BODY_BOB.sample(seconds)))
            .set(HEAD, head_state(HEAD_NOD.sample(seconds)));
        pose
    }
}
