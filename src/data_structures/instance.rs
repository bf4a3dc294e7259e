//! Per-segment instance data for GPU rendering.
//!
//! Every segment of an articulated model is the same unit cube or cylinder,
//! drawn with its own world matrix, colour and texture selector. Packing those
//! into an instance buffer lets all cubes of a model go out in one instanced draw.

use cgmath::{Matrix, Matrix3, SquareMatrix};

use crate::{
    data_structures::{model::Vertex, transform::RigidTransform},
    render::{DrawCall, TextureSelector},
};

/// World transform plus appearance of one segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentInstance {
    pub transform: RigidTransform,
    pub color: [f32; 4],
    pub texture: TextureSelector,
}

impl SegmentInstance {
    pub fn new(transform: RigidTransform) -> Self {
        Self {
            transform,
            color: [1.0, 1.0, 1.0, 1.0],
            texture: TextureSelector::SolidColor,
        }
    }

    pub fn to_raw(&self) -> InstanceRaw {
        let model = *self.transform.matrix();
        let linear = Matrix3::from_cols(
            model.x.truncate(),
            model.y.truncate(),
            model.z.truncate(),
        );
        let det = linear.determinant();
        // Normals need the inverse transpose once segments are scaled non-uniformly.
        let normal = linear
            .invert()
            .map(|inv| inv.transpose())
            .unwrap_or_else(Matrix3::identity);
        InstanceRaw {
            model: model.into(),
            normal: normal.into(),
            color: self.color,
            texture: self.texture.to_raw(),
            handedness: det.signum(),
        }
    }
}

impl From<&DrawCall> for SegmentInstance {
    fn from(call: &DrawCall) -> Self {
        Self {
            transform: call.transform,
            color: call.color,
            texture: call.texture,
        }
    }
}

impl Default for SegmentInstance {
    fn default() -> Self {
        Self::new(RigidTransform::identity())
    }
}

/**
 * The raw instance is the actual data stored on the GPU
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    model: [[f32; 4]; 4],
    normal: [[f32; 3]; 3],
    color: [f32; 4],
    texture: i32,
    handedness: f32,
}

impl InstanceRaw {
    pub fn model(&self) -> [[f32; 4]; 4] {
        self.model
    }

    pub fn texture(&self) -> i32 {
        self.texture
    }

    pub fn handedness(&self) -> f32 {
        self.handedness
    }
}

/**
 * Stride layout: model matrix as four vec4s, normal matrix as three vec3s,
 * then colour, texture selector and handedness. Locations start at 5 so the
 * per-vertex attributes keep 0..4.
 */
impl Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            // Advance once per instance rather than once per vertex.
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 19]>() as wgpu::BufferAddress,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 22]>() as wgpu::BufferAddress,
                    shader_location: 11,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 25]>() as wgpu::BufferAddress,
                    shader_location: 12,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 29]>() as wgpu::BufferAddress,
                    shader_location: 13,
                    format: wgpu::VertexFormat::Sint32,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 30]>() as wgpu::BufferAddress,
                    shader_location: 14,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}
