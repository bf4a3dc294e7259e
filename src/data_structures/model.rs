//! Vertex formats shared by the primitive templates and the batched world.

use crate::resources::mesh::MeshTemplate;

/// Types that describe their own GPU vertex buffer layout.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// Position plus texture coordinates. Both the unit primitives and the voxel
/// batch use this layout, so one pipeline can draw either.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl ModelVertex {
    /// Zips flat xyz and uv arrays into vertices. Extra trailing data is ignored.
    pub fn interleave(positions: &[f32], uvs: &[f32]) -> Vec<ModelVertex> {
        positions
            .chunks_exact(3)
            .zip(uvs.chunks_exact(2))
            .map(|(p, uv)| ModelVertex {
                position: [p[0], p[1], p[2]],
                tex_coords: [uv[0], uv[1]],
            })
            .collect()
    }
}

impl From<&MeshTemplate> for Vec<ModelVertex> {
    fn from(template: &MeshTemplate) -> Self {
        ModelVertex::interleave(template.positions(), template.uvs())
    }
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}
