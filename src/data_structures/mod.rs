//! Engine data structures: transforms, segment trees, the voxel map and its geometry.
//!
//! This module contains the core data types for scene representation:
//!
//! - `transform` is the 4x4 rigid transform value type
//! - `scene_graph` holds the segment tree of articulated models
//! - `animation` produces joint values from time or manual input
//! - `rat` describes the two rat models as data
//! - `instance` holds per-segment GPU instance data
//! - `model` contains the vertex formats
//! - `block` is the voxel height map
//! - `terrain` batches the voxel map into one vertex buffer

pub mod animation;
pub mod block;
pub mod instance;
pub mod model;
pub mod rat;
pub mod scene_graph;
pub mod terrain;
pub mod transform;
