//! Batched voxel geometry.
//!
//! All blocks of a [`VoxelMap`] are packed into one position buffer and one UV
//! buffer so the whole world is a single draw call. The buffers are rebuilt in
//! full, and only when the map reports itself dirty.

use crate::{
    data_structures::{block::VoxelMap, model::ModelVertex},
    resources::mesh::{CUBE_POSITIONS, CUBE_UVS, CUBE_VERTEX_COUNT},
};

/// Packed triangle-list geometry: `positions` holds xyz triples, `uvs` holds uv pairs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerrainGeometry {
    pub positions: Vec<f32>,
    pub uvs: Vec<f32>,
    pub vertex_count: usize,
}

impl TerrainGeometry {
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// Interleaves positions and uvs into GPU vertices.
    pub fn to_vertices(&self) -> Vec<ModelVertex> {
        ModelVertex::interleave(&self.positions, &self.uvs)
    }
}

/// Owns the cached world geometry and rebuilds it when the map changes.
#[derive(Debug, Default)]
pub struct GeometryBatcher {
    geometry: TerrainGeometry,
    rebuilds: u64,
}

impl GeometryBatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /**
     * Recompiles the geometry if `map` is dirty and clears the flag.
     *
     * Returns `true` when a rebuild happened. A clean map leaves the cached
     * buffers untouched, so calling this every frame costs nothing between edits.
     */
    pub fn rebuild_if_dirty(&mut self, map: &mut VoxelMap) -> bool {
        if !map.is_dirty() {
            return false;
        }
        self.geometry = build_geometry(map);
        map.clear_dirty();
        self.rebuilds += 1;
        log::info!(
            "Map geometry rebuilt: {} blocks, {} vertices",
            self.geometry.vertex_count / CUBE_VERTEX_COUNT,
            self.geometry.vertex_count
        );
        true
    }

    pub fn geometry(&self) -> &TerrainGeometry {
        &self.geometry
    }

    pub fn vertex_count(&self) -> usize {
        self.geometry.vertex_count
    }

    /// How many times the geometry has been compiled.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}

/// Emits `h` stacked unit cubes for every column, offset by `(x - N/2, level, z - N/2)`.
pub fn build_geometry(map: &VoxelMap) -> TerrainGeometry {
    let vertex_count = map.block_count() as usize * CUBE_VERTEX_COUNT;
    let mut positions = Vec::with_capacity(vertex_count * 3);
    let mut uvs = Vec::with_capacity(vertex_count * 2);

    for (x, z, height) in map.columns() {
        let (wx, wz) = map.cell_to_world(x, z);
        for level in 0..height {
            let wy = level as f32;
            for v in CUBE_POSITIONS.chunks_exact(3) {
                positions.extend_from_slice(&[v[0] + wx, v[1] + wy, v[2] + wz]);
            }
            uvs.extend_from_slice(&CUBE_UVS);
        }
    }

    TerrainGeometry {
        positions,
        uvs,
        vertex_count,
    }
}
