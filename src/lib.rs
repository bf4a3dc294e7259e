//! blocky-world
//!
//! Hierarchical blocky animals and an editable voxel maze, explored by a
//! collision-constrained first-person camera. The crate keeps the scene logic
//! (transforms, segment trees, the voxel map and its batched geometry, the
//! camera) free of any GPU state; each frame it hands the renderer camera
//! matrices, per-segment draw calls and one packed buffer for the whole world.
//!
//! High-level modules
//! - `camera`: the first-person camera, its input controller and uniform
//! - `context`: runtime configuration shared by every flow
//! - `data_structures`: transforms, segment trees, voxel map, batched geometry, animation
//! - `error`: errors raised while assembling an articulated model
//! - `flow`: the flow trait, input commands and the frame loop
//! - `flows`: the voxel world and the animal viewer
//! - `resources`: primitive templates and GPU buffer helpers
//! - `render`: what a frame hands to the renderer
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod flows;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use camera::{Camera, CameraController};
pub use context::Context;
pub use data_structures::{
    block::VoxelMap,
    scene_graph::{ArticulatedModel, MeshKind, Segment, SegmentSpec},
    terrain::GeometryBatcher,
    transform::RigidTransform,
};
pub use error::{RigError, RigResult};
pub use flow::{Command, FlowRunner, GraphicsFlow};
pub use cgmath;
pub use winit::event::WindowEvent;
