//! GPU buffers for the batched world, the primitive templates and segment instances.
//!
//! Buffers are created with `create_buffer_init`. When the amount of data
//! changes the buffer is recreated; otherwise the new contents are written in
//! place with `queue.write_buffer`.
//!
//! These are the renderer-facing types; the headless checks live behind the
//! `integration-tests` feature.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        instance::{InstanceRaw, SegmentInstance},
        model::ModelVertex,
        scene_graph::MeshKind,
        terrain::TerrainGeometry,
    },
    resources::mesh,
};

/// Whether a buffer holding `current` elements has to be recreated to hold `next`.
fn needs_realloc(current: usize, next: usize) -> bool {
    current != next
}

fn vertex_buffer<T: bytemuck::Pod>(device: &wgpu::Device, label: &str, data: &[T]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(data),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    })
}

/// The single vertex buffer of the voxel world.
#[derive(Debug)]
pub struct TerrainBuffers {
    vertex_buffer: wgpu::Buffer,
    vertex_count: usize,
    uploaded_rebuild: u64,
}

impl TerrainBuffers {
    pub fn new(device: &wgpu::Device, geometry: &TerrainGeometry) -> Self {
        let vertices = geometry.to_vertices();
        Self {
            vertex_buffer: vertex_buffer(device, "Terrain Vertex Buffer", &vertices),
            vertex_count: vertices.len(),
            uploaded_rebuild: 0,
        }
    }

    /**
     * Uploads the geometry if it was rebuilt since the last upload.
     *
     * `rebuild` is the batcher's rebuild counter, so a clean map never touches
     * the GPU. Returns `true` when data was uploaded.
     */
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        geometry: &TerrainGeometry,
        rebuild: u64,
    ) -> bool {
        if rebuild == self.uploaded_rebuild {
            return false;
        }
        let vertices = geometry.to_vertices();
        if needs_realloc(self.vertex_count, vertices.len()) {
            self.vertex_buffer = vertex_buffer(device, "Terrain Vertex Buffer", &vertices);
            self.vertex_count = vertices.len();
        } else {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        self.uploaded_rebuild = rebuild;
        true
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count as u32
    }
}

/// Static vertex buffer of one unit primitive.
#[derive(Debug)]
pub struct MeshBuffer {
    pub kind: MeshKind,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

impl MeshBuffer {
    pub fn new(device: &wgpu::Device, kind: MeshKind) -> Self {
        let vertices: Vec<ModelVertex> = mesh::template(kind).into();
        Self {
            kind,
            vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Vertex Buffer", kind)),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            vertex_count: vertices.len() as u32,
        }
    }
}

/// Per-frame instance data of every segment drawn with one primitive.
#[derive(Debug)]
pub struct InstanceBuffers {
    instance_buffer: wgpu::Buffer,
    amount: usize,
}

impl InstanceBuffers {
    pub fn new(device: &wgpu::Device, instances: &[SegmentInstance]) -> Self {
        let raw = instances.iter().map(SegmentInstance::to_raw).collect::<Vec<_>>();
        Self {
            instance_buffer: vertex_buffer(device, "Instance Buffer", &raw),
            amount: raw.len(),
        }
    }

    /// Writes this frame's instances, recreating the buffer if the count changed.
    pub fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, instances: &[SegmentInstance]) {
        let raw: Vec<InstanceRaw> = instances.iter().map(SegmentInstance::to_raw).collect();
        if needs_realloc(self.amount, raw.len()) {
            self.instance_buffer = vertex_buffer(device, "Instance Buffer", &raw);
            self.amount = raw.len();
        } else {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&raw));
        }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.instance_buffer
    }

    pub fn amount(&self) -> u32 {
        self.amount as u32
    }
}

#[cfg(test)]
mod tests {
    use super::needs_realloc;

    #[test]
    fn same_length_is_written_in_place() {
        assert!(!needs_realloc(72, 72));
        assert!(!needs_realloc(0, 0));
    }

    #[test]
    fn changed_length_recreates_the_buffer() {
        assert!(needs_realloc(72, 108));
        assert!(needs_realloc(36, 0));
    }
}
