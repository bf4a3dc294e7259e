//! What a frame hands to the renderer.
//!
//! The scene logic never talks to the GPU directly. Each frame it produces a
//! [`Frame`]: camera matrices plus a [`Render`] tree describing per-segment draw
//! calls and the batched voxel geometry. A renderer walks that tree and maps
//! every item onto its own pipelines.
//!
//! # Key types
//!
//! - [`TextureSelector`] chooses between solid colour, UV debug output and a texture unit
//! - [`DrawCall`] is one unit primitive with its world matrix
//! - [`Batched`] borrows the packed world geometry for one draw call
//! - [`Render`] composes the above

use crate::data_structures::{
    scene_graph::MeshKind, terrain::TerrainGeometry, transform::RigidTransform,
};

/// How a primitive is coloured. Encoded for shaders as `-2`, `-1` or the unit index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextureSelector {
    #[default]
    SolidColor,
    UvDebug,
    Unit(u32),
}

impl TextureSelector {
    pub fn to_raw(self) -> i32 {
        match self {
            TextureSelector::SolidColor => -2,
            TextureSelector::UvDebug => -1,
            TextureSelector::Unit(unit) => unit as i32,
        }
    }

    /// Inverse of [`to_raw`](Self::to_raw). Values below `-2` have no meaning.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            -2 => Some(TextureSelector::SolidColor),
            -1 => Some(TextureSelector::UvDebug),
            unit if unit >= 0 => Some(TextureSelector::Unit(unit as u32)),
            _ => None,
        }
    }
}

/// A single unit primitive placed in the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCall {
    pub transform: RigidTransform,
    pub mesh: MeshKind,
    pub color: [f32; 4],
    pub texture: TextureSelector,
}

impl DrawCall {
    /// Column-major model matrix for shader upload.
    pub fn model_matrix(&self) -> [f32; 16] {
        self.transform.to_cols_array()
    }
}

/// The packed voxel world, borrowed from the batcher for the current frame.
#[derive(Clone, Copy, Debug)]
pub struct Batched<'a> {
    pub positions: &'a [f32],
    pub uvs: &'a [f32],
    pub vertex_count: usize,
    pub color: [f32; 4],
    pub texture: TextureSelector,
}

impl<'a> Batched<'a> {
    pub fn new(geometry: &'a TerrainGeometry, texture: TextureSelector) -> Self {
        Self {
            positions: &geometry.positions,
            uvs: &geometry.uvs,
            vertex_count: geometry.vertex_count,
            color: [1.0, 1.0, 1.0, 1.0],
            texture,
        }
    }
}

/// Specifies what should be drawn this frame.
///
/// # Variants
///
/// - `None` draws nothing
/// - `Default(DrawCall)` draws one primitive
/// - `Defaults(Vec<DrawCall>)` draws a list of primitives, e.g. every segment of a model
/// - `Terrain(Batched)` draws the whole voxel world in one call
/// - `Composed(Vec<Render>)` recursively draws several renders in order
pub enum Render<'a> {
    None,
    Default(DrawCall),
    Defaults(Vec<DrawCall>),
    Terrain(Batched<'a>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    /// Flattens the tree into individual draw calls and terrain batches, in draw order.
    pub fn collect(self, calls: &mut Vec<DrawCall>, terrain: &mut Vec<Batched<'a>>) {
        match self {
            Render::None => (),
            Render::Default(call) => calls.push(call),
            Render::Defaults(mut vec) => calls.append(&mut vec),
            Render::Terrain(batched) => terrain.push(batched),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.collect(calls, terrain)),
        }
    }

    /// Number of GPU draw calls this render needs.
    pub fn draw_count(&self) -> usize {
        match self {
            Render::None => 0,
            Render::Default(_) => 1,
            Render::Defaults(vec) => vec.len(),
            Render::Terrain(batched) => usize::from(batched.vertex_count > 0),
            Render::Composed(renders) => renders.iter().map(Render::draw_count).sum(),
        }
    }
}

/// Everything the renderer needs for one frame.
pub struct Frame<'a> {
    pub view: [f32; 16],
    pub projection: [f32; 16],
    pub clear_colour: [f32; 4],
    pub render: Render<'a>,
}
