//! Rigid transforms as 4x4 matrix values.
//!
//! A [`RigidTransform`] never mutates in place. Every operation returns a new
//! transform, so two sibling branches that start from the same parent can never
//! observe each other's translations, rotations or scales.

use std::ops::Mul;

use cgmath::{Deg, InnerSpace, Matrix4, Point3, SquareMatrix, Transform, Vector3};

const AFFINE_EPSILON: f32 = 1e-5;

/// An affine 4x4 transform.
///
/// Composition follows the column-vector convention: `parent * local` applies
/// `local` first and `parent` afterwards, i.e. a world point is
/// `parent · local · point`. `translate`, `rotate` and `scale` all post-multiply,
/// so a chain `t.translate(..).rotate(..).scale(..)` scales the primitive first,
/// rotates it and finally moves it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidTransform {
    matrix: Matrix4<f32>,
}

impl RigidTransform {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Returns `parent · local`.
    pub fn compose(parent: &RigidTransform, local: &RigidTransform) -> Self {
        parent * local
    }

    /// A pure translation.
    pub fn from_translation(dx: f32, dy: f32, dz: f32) -> Self {
        Self::identity().translate(dx, dy, dz)
    }

    pub fn translate(&self, dx: f32, dy: f32, dz: f32) -> Self {
        Self {
            matrix: self.matrix * Matrix4::from_translation(Vector3::new(dx, dy, dz)),
        }
    }

    /// Post-multiplies a rotation of `angle_degrees` about `axis`.
    ///
    /// The axis does not need to be normalized. A zero-length axis has no
    /// direction to rotate about, so the transform is returned unchanged.
    pub fn rotate(&self, angle_degrees: f32, axis: Vector3<f32>) -> Self {
        if axis.magnitude2() <= f32::EPSILON {
            return *self;
        }
        Self {
            matrix: self.matrix * Matrix4::from_axis_angle(axis.normalize(), Deg(angle_degrees)),
        }
    }

    /// Shorthand for [`rotate`](Self::rotate) with the axis given as components.
    pub fn rotate_xyz(&self, angle_degrees: f32, x: f32, y: f32, z: f32) -> Self {
        self.rotate(angle_degrees, Vector3::new(x, y, z))
    }

    pub fn scale(&self, sx: f32, sy: f32, sz: f32) -> Self {
        Self {
            matrix: self.matrix * Matrix4::from_nonuniform_scale(sx, sy, sz),
        }
    }

    pub fn transform_point(&self, point: Point3<f32>) -> Point3<f32> {
        self.matrix.transform_point(point)
    }

    pub fn transform_vector(&self, vector: Vector3<f32>) -> Vector3<f32> {
        self.matrix.transform_vector(vector)
    }

    /// Where the local origin ends up in the parent space.
    pub fn origin(&self) -> Point3<f32> {
        Point3::new(self.matrix.w.x, self.matrix.w.y, self.matrix.w.z)
    }

    pub fn matrix(&self) -> &Matrix4<f32> {
        &self.matrix
    }

    /// The 16 matrix entries in column-major order, as uploaded to shaders.
    pub fn to_cols_array(&self) -> [f32; 16] {
        let cols: [[f32; 4]; 4] = self.matrix.into();
        let mut out = [0.0; 16];
        for (c, col) in cols.iter().enumerate() {
            out[c * 4..c * 4 + 4].copy_from_slice(col);
        }
        out
    }

    pub fn to_cols(&self) -> [[f32; 4]; 4] {
        self.matrix.into()
    }

    /// True while the bottom row is still `(0, 0, 0, 1)`.
    pub fn is_affine(&self) -> bool {
        let m = &self.matrix;
        m.x.w.abs() < AFFINE_EPSILON
            && m.y.w.abs() < AFFINE_EPSILON
            && m.z.w.abs() < AFFINE_EPSILON
            && (m.w.w - 1.0).abs() < AFFINE_EPSILON
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Matrix4<f32>> for RigidTransform {
    fn from(matrix: Matrix4<f32>) -> Self {
        Self { matrix }
    }
}

impl Mul<RigidTransform> for RigidTransform {
    type Output = Self;

    fn mul(self, rhs: RigidTransform) -> Self::Output {
        RigidTransform {
            matrix: self.matrix * rhs.matrix,
        }
    }
}

impl<'a, 'b> Mul<&'b RigidTransform> for &'a RigidTransform {
    type Output = RigidTransform;

    fn mul(self, rhs: &'b RigidTransform) -> Self::Output {
        RigidTransform {
            matrix: self.matrix * rhs.matrix,
        }
    }
}
