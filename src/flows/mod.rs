//! The two scenes shipped with the crate.
//!
//! - `world` is the walkable voxel maze with a rat hidden in it
//! - `animal` is the articulated rat on its own, posed by sliders or animated

pub mod animal;
pub mod world;
