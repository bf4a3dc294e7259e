use std::{f32::consts::PI, sync::LazyLock};

use crate::data_structures::scene_graph::MeshKind;

/// 6 faces × 2 triangles × 3 vertices.
pub const CUBE_VERTEX_COUNT: usize = 36;

pub const DEFAULT_CYLINDER_SEGMENTS: usize = 12;

/// Each cylinder slice is a side quad (6), a top cap triangle (3) and a bottom cap triangle (3).
pub const CYLINDER_VERTICES_PER_SEGMENT: usize = 12;

/**
 * Unit cube centred on the origin, spanning -0.5..0.5 on every axis.
 *
 * Face order is front, back, top, bottom, right, left; every face is two
 * triangles. `CUBE_UVS` follows the same vertex order.
 */
#[rustfmt::skip]
pub const CUBE_POSITIONS: [f32; CUBE_VERTEX_COUNT * 3] = [
    // front (z = 0.5)
    -0.5, -0.5,  0.5,   0.5, -0.5,  0.5,   0.5,  0.5,  0.5,
    -0.5, -0.5,  0.5,   0.5,  0.5,  0.5,  -0.5,  0.5,  0.5,
    // back (z = -0.5)
    -0.5, -0.5, -0.5,  -0.5,  0.5, -0.5,   0.5,  0.5, -0.5,
    -0.5, -0.5, -0.5,   0.5,  0.5, -0.5,   0.5, -0.5, -0.5,
    // top (y = 0.5)
    -0.5,  0.5, -0.5,  -0.5,  0.5,  0.5,   0.5,  0.5,  0.5,
    -0.5,  0.5, -0.5,   0.5,  0.5,  0.5,   0.5,  0.5, -0.5,
    // bottom (y = -0.5)
    -0.5, -0.5, -0.5,   0.5, -0.5, -0.5,   0.5, -0.5,  0.5,
    -0.5, -0.5, -0.5,   0.5, -0.5,  0.5,  -0.5, -0.5,  0.5,
    // right (x = 0.5)
     0.5, -0.5, -0.5,   0.5,  0.5, -0.5,   0.5,  0.5,  0.5,
     0.5, -0.5, -0.5,   0.5,  0.5,  0.5,   0.5, -0.5,  0.5,
    // left (x = -0.5)
    -0.5, -0.5, -0.5,  -0.5, -0.5,  0.5,  -0.5,  0.5,  0.5,
    -0.5, -0.5, -0.5,  -0.5,  0.5,  0.5,  -0.5,  0.5, -0.5,
];

#[rustfmt::skip]
pub const CUBE_UVS: [f32; CUBE_VERTEX_COUNT * 2] = [
    // front
    0.0, 0.0,  1.0, 0.0,  1.0, 1.0,   0.0, 0.0,  1.0, 1.0,  0.0, 1.0,
    // back
    1.0, 0.0,  1.0, 1.0,  0.0, 1.0,   1.0, 0.0,  0.0, 1.0,  0.0, 0.0,
    // top
    0.0, 0.0,  0.0, 1.0,  1.0, 1.0,   0.0, 0.0,  1.0, 1.0,  1.0, 0.0,
    // bottom
    0.0, 1.0,  1.0, 1.0,  1.0, 0.0,   0.0, 1.0,  1.0, 0.0,  0.0, 0.0,
    // right
    1.0, 0.0,  1.0, 1.0,  0.0, 1.0,   1.0, 0.0,  0.0, 1.0,  0.0, 0.0,
    // left
    0.0, 0.0,  1.0, 0.0,  1.0, 1.0,   0.0, 0.0,  1.0, 1.0,  0.0, 1.0,
];

/// Non-indexed triangle list with one UV pair per vertex.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshTemplate {
    positions: Vec<f32>,
    uvs: Vec<f32>,
}

impl MeshTemplate {
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn uvs(&self) -> &[f32] {
        &self.uvs
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn position(&self, i: usize) -> [f32; 3] {
        [
            self.positions[i * 3],
            self.positions[i * 3 + 1],
            self.positions[i * 3 + 2],
        ]
    }
}

static UNIT_CUBE: LazyLock<MeshTemplate> = LazyLock::new(|| MeshTemplate {
    positions: CUBE_POSITIONS.to_vec(),
    uvs: CUBE_UVS.to_vec(),
});

static UNIT_CYLINDER: LazyLock<MeshTemplate> =
    LazyLock::new(|| cylinder(DEFAULT_CYLINDER_SEGMENTS));

pub fn unit_cube() -> &'static MeshTemplate {
    &UNIT_CUBE
}

/// The cylinder with [`DEFAULT_CYLINDER_SEGMENTS`] slices, built on first use.
pub fn unit_cylinder() -> &'static MeshTemplate {
    &UNIT_CYLINDER
}

pub fn template(kind: MeshKind) -> &'static MeshTemplate {
    match kind {
        MeshKind::Cube => unit_cube(),
        MeshKind::Cylinder => unit_cylinder(),
    }
}

/**
 * Builds a cylinder of height 1 along Y with radius 0.5, centred on the origin.
 *
 * Fewer than three slices cannot enclose a volume, so `segments` is raised to 3.
 * The side wraps u around the circumference with v running bottom to top; the
 * caps map the disc onto the unit square.
 */
pub fn cylinder(segments: usize) -> MeshTemplate {
    let segments = segments.max(3);
    let step = 2.0 * PI / segments as f32;
    let mut positions = Vec::with_capacity(segments * CYLINDER_VERTICES_PER_SEGMENT * 3);
    let mut uvs = Vec::with_capacity(segments * CYLINDER_VERTICES_PER_SEGMENT * 2);

    for i in 0..segments {
        let (a1, a2) = (i as f32 * step, (i + 1) as f32 * step);
        let (x1, z1) = (0.5 * a1.cos(), 0.5 * a1.sin());
        let (x2, z2) = (0.5 * a2.cos(), 0.5 * a2.sin());
        let (u1, u2) = (i as f32 / segments as f32, (i + 1) as f32 / segments as f32);
        let cap = |x: f32, z: f32| [0.5 + x, 0.5 + z];

        // side
        positions.extend_from_slice(&[x1, -0.5, z1, x2, -0.5, z2, x2, 0.5, z2]);
        uvs.extend_from_slice(&[u1, 0.0, u2, 0.0, u2, 1.0]);
        positions.extend_from_slice(&[x1, -0.5, z1, x2, 0.5, z2, x1, 0.5, z1]);
        uvs.extend_from_slice(&[u1, 0.0, u2, 1.0, u1, 1.0]);

        // top cap
        positions.extend_from_slice(&[0.0, 0.5, 0.0, x1, 0.5, z1, x2, 0.5, z2]);
        uvs.extend_from_slice(&[0.5, 0.5]);
        uvs.extend_from_slice(&cap(x1, z1));
        uvs.extend_from_slice(&cap(x2, z2));

        // bottom cap
        positions.extend_from_slice(&[0.0, -0.5, 0.0, x2, -0.5, z2, x1, -0.5, z1]);
        uvs.extend_from_slice(&[0.5, 0.5]);
        uvs.extend_from_slice(&cap(x2, z2));
        uvs.extend_from_slice(&cap(x1, z1));
    }

    MeshTemplate { positions, uvs }
}
