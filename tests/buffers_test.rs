#[cfg(feature = "integration-tests")]
use blocky_world::{
    GeometryBatcher, MeshKind, RigidTransform, VoxelMap,
    data_structures::{instance::SegmentInstance, model::ModelVertex},
    resources::{
        buffers::{InstanceBuffers, MeshBuffer, TerrainBuffers},
        mesh::{CUBE_VERTEX_COUNT, CYLINDER_VERTICES_PER_SEGMENT, DEFAULT_CYLINDER_SEGMENTS},
    },
};

/// A device on whatever adapter is available, or `None` on machines without one.
#[cfg(feature = "integration-tests")]
fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..wgpu::InstanceDescriptor::new_without_display_handle()
    });
    futures::executor::block_on(async {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok()?;
        adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .ok()
    })
}

#[test]
#[cfg(feature = "integration-tests")]
fn terrain_upload_follows_rebuilds() {
    let Some((device, queue)) = headless_device() else {
        eprintln!("no adapter, skipping");
        return;
    };
    let mut map = VoxelMap::new(3);
    map.set(1, 1, 2);
    let mut batcher = GeometryBatcher::new();
    batcher.rebuild_if_dirty(&mut map);

    let mut buffers = TerrainBuffers::new(&device, batcher.geometry());
    assert_eq!(buffers.vertex_count() as usize, 2 * CUBE_VERTEX_COUNT);
    assert!(buffers.upload(&device, &queue, batcher.geometry(), batcher.rebuilds()));
    // Nothing changed since the last upload.
    assert!(!buffers.upload(&device, &queue, batcher.geometry(), batcher.rebuilds()));

    map.raise(0, 0);
    batcher.rebuild_if_dirty(&mut map);
    assert!(buffers.upload(&device, &queue, batcher.geometry(), batcher.rebuilds()));
    assert_eq!(buffers.vertex_count() as usize, 3 * CUBE_VERTEX_COUNT);
    let stride = std::mem::size_of::<ModelVertex>();
    assert_eq!(buffers.buffer().size() as usize, 3 * CUBE_VERTEX_COUNT * stride);
}

#[test]
#[cfg(feature = "integration-tests")]
fn primitive_templates_upload_every_vertex() {
    let Some((device, _)) = headless_device() else {
        eprintln!("no adapter, skipping");
        return;
    };
    let cube = MeshBuffer::new(&device, MeshKind::Cube);
    let cylinder = MeshBuffer::new(&device, MeshKind::Cylinder);
    assert_eq!(cube.kind, MeshKind::Cube);
    assert_eq!(cube.vertex_count as usize, CUBE_VERTEX_COUNT);
    assert_eq!(
        cylinder.vertex_count as usize,
        DEFAULT_CYLINDER_SEGMENTS * CYLINDER_VERTICES_PER_SEGMENT
    );
}

#[test]
#[cfg(feature = "integration-tests")]
fn instance_buffer_grows_and_rewrites() {
    let Some((device, queue)) = headless_device() else {
        eprintln!("no adapter, skipping");
        return;
    };
    let one = vec![SegmentInstance::default()];
    let mut buffers = InstanceBuffers::new(&device, &one);
    assert_eq!(buffers.amount(), 1);
    let size = buffers.buffer().size();

    let moved = vec![SegmentInstance::new(RigidTransform::from_translation(1.0, 0.0, 0.0))];
    buffers.write(&device, &queue, &moved);
    assert_eq!(buffers.amount(), 1);
    assert_eq!(buffers.buffer().size(), size);

    let three = vec![SegmentInstance::default(); 3];
    buffers.write(&device, &queue, &three);
    assert_eq!(buffers.amount(), 3);
    assert_eq!(buffers.buffer().size(), 3 * size);
}
