//! Joint values as functions of time.
//!
//! Everything here is pure: sampling the same animation at the same elapsed
//! time always yields the same pose, so playback can be replayed and tested
//! frame by frame.

use cgmath::{Vector3, Zero};

/// Where joint angles come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JointMode {
    /// Angles are supplied directly by external controls.
    #[default]
    Manual,
    /// Angles are computed from elapsed time.
    Animated,
}

/// Value of one joint: a rotation about the segment's joint axis and a
/// translation applied at the pivot before it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointState {
    pub angle: f32,
    pub displacement: Vector3<f32>,
}

impl JointState {
    pub fn angle(angle: f32) -> Self {
        Self {
            angle,
            displacement: Vector3::zero(),
        }
    }

    pub fn displaced(displacement: Vector3<f32>) -> Self {
        Self {
            angle: 0.0,
            displacement,
        }
    }
}

impl Default for JointState {
    fn default() -> Self {
        Self::angle(0.0)
    }
}

/// Named joint values in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pose {
    joints: Vec<(String, JointState)>,
}

impl Pose {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a joint, replacing an earlier value for the same name.
    pub fn set(&mut self, name: &str, state: JointState) -> &mut Self {
        match self.joints.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = state,
            None => self.joints.push((name.to_string(), state)),
        }
        self
    }

    pub fn with(mut self, name: &str, state: JointState) -> Self {
        self.set(name, state);
        self
    }

    pub fn with_angle(self, name: &str, angle: f32) -> Self {
        self.with(name, JointState::angle(angle))
    }

    pub fn get(&self, name: &str) -> Option<JointState> {
        self.joints
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, state)| *state)
    }

    pub fn angle(&self, name: &str) -> Option<f32> {
        self.get(name).map(|s| s.angle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &JointState)> {
        self.joints.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}

/// Anything that can produce a pose for an elapsed time in seconds.
pub trait Animation {
    fn sample(&self, seconds: f32) -> Pose;
}

/// `amplitude · sin(frequency · t + phase)`, with frequency in radians per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Oscillator {
    pub amplitude: f32,
    pub frequency: f32,
    pub phase: f32,
}

impl Oscillator {
    pub const fn new(amplitude: f32, frequency: f32, phase: f32) -> Self {
        Self {
            amplitude,
            frequency,
            phase,
        }
    }

    pub fn sample(&self, seconds: f32) -> f32 {
        self.amplitude * (self.frequency * seconds + self.phase).sin()
    }

    /// The same wave shifted by `phase` radians.
    pub fn shifted(&self, phase: f32) -> Self {
        Self {
            phase: self.phase + phase,
            ..*self
        }
    }
}

/// Jump height and spin of a poke at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PokeState {
    pub jump_height: f32,
    pub spin_degrees: f32,
}

/**
 * A one-shot hop: the model jumps along a half-sine arc while spinning one full turn.
 *
 * The poke is stateless apart from its start time; [`sample`](Self::sample)
 * is a pure function of the current time.
 */
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PokeAnimation {
    started_at: Option<f32>,
    duration: f32,
    height: f32,
}

impl PokeAnimation {
    pub const DEFAULT_DURATION: f32 = 1.5;
    pub const DEFAULT_HEIGHT: f32 = 0.3;

    pub fn new(duration: f32, height: f32) -> Self {
        Self {
            started_at: None,
            duration,
            height,
        }
    }

    pub fn start(&mut self, seconds: f32) {
        self.started_at = Some(seconds);
    }

    pub fn is_active(&self, seconds: f32) -> bool {
        self.sample(seconds).is_some()
    }

    /// `None` before the poke started or once it has finished.
    pub fn sample(&self, seconds: f32) -> Option<PokeState> {
        let start = self.started_at?;
        let u = (seconds - start) / self.duration;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        Some(PokeState {
            jump_height: self.height * (u * std::f32::consts::PI).sin(),
            spin_degrees: 360.0 * u,
        })
    }

    /// Forgets a finished poke so later samples stay `None` without rechecking.
    pub fn update(&mut self, seconds: f32) {
        if let Some(start) = self.started_at {
            if seconds - start > self.duration {
                self.started_at = None;
            }
        }
    }
}

impl Default for PokeAnimation {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DURATION, Self::DEFAULT_HEIGHT)
    }
}
