use nalgebra::{Matrix4, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::vertex::{VertexXy, VertexXyzm};

/// A 4×4 homogeneous affine transformation.
///
/// ```text
/// | a b c xoff |
/// | d e f yoff |
/// | g h i zoff |
/// | 0 0 0 1    |
/// ```
///
/// Applied to either the XY or the XYZ ordinates of a vertex; the M ordinate
/// is never transformed.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffineMatrix(Matrix4<f64>);

impl AffineMatrix {
    /// The identity transformation.
    pub fn identity() -> Self {
        Self(Matrix4::identity())
    }

    /// Translation by the given offsets.
    pub fn translate(x: f64, y: f64, z: f64) -> Self {
        Self(Matrix4::new_translation(&Vector3::new(x, y, z)))
    }

    /// Per-axis scaling.
    pub fn scale(x: f64, y: f64, z: f64) -> Self {
        Self(Matrix4::new_nonuniform_scaling(&Vector3::new(x, y, z)))
    }

    /// Rotation around the X axis by `angle` radians.
    pub fn rotate_x(angle: f64) -> Self {
        Self(Rotation3::from_axis_angle(&Vector3::x_axis(), angle).to_homogeneous())
    }

    /// Rotation around the Y axis by `angle` radians.
    pub fn rotate_y(angle: f64) -> Self {
        Self(Rotation3::from_axis_angle(&Vector3::y_axis(), angle).to_homogeneous())
    }

    /// Rotation around the Z axis by `angle` radians.
    pub fn rotate_z(angle: f64) -> Self {
        Self(Rotation3::from_axis_angle(&Vector3::z_axis(), angle).to_homogeneous())
    }

    /// Scaling followed by translation.
    pub fn translate_scale(x: f64, y: f64, z: f64, sx: f64, sy: f64, sz: f64) -> Self {
        Self(
            Matrix4::new_translation(&Vector3::new(x, y, z))
                * Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz)),
        )
    }

    /// Applies the XY part of the transformation.
    pub fn apply_xy(&self, vertex: &VertexXy) -> VertexXy {
        let m = &self.0;
        VertexXy::new(
            m[(0, 0)] * vertex.x + m[(0, 1)] * vertex.y + m[(0, 3)],
            m[(1, 0)] * vertex.x + m[(1, 1)] * vertex.y + m[(1, 3)],
        )
    }

    /// Applies the XYZ part of the transformation, passing M through.
    pub fn apply_xyz(&self, vertex: &VertexXyzm) -> VertexXyzm {
        let m = &self.0;
        VertexXyzm::new(
            m[(0, 0)] * vertex.x + m[(0, 1)] * vertex.y + m[(0, 2)] * vertex.z + m[(0, 3)],
            m[(1, 0)] * vertex.x + m[(1, 1)] * vertex.y + m[(1, 2)] * vertex.z + m[(1, 3)],
            m[(2, 0)] * vertex.x + m[(2, 1)] * vertex.y + m[(2, 2)] * vertex.z + m[(2, 3)],
            vertex.m,
        )
    }
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn identity_is_noop() {
        let m = AffineMatrix::identity();
        let v = VertexXy::new(3.0, -2.0);
        assert_eq!(m.apply_xy(&v), v);
    }

    #[test]
    fn translate_offsets_ordinates() {
        let m = AffineMatrix::translate(1.0, 2.0, 3.0);
        assert_eq!(m.apply_xy(&VertexXy::new(1.0, 1.0)), VertexXy::new(2.0, 3.0));
        assert_eq!(
            m.apply_xyz(&VertexXyzm::new(0.0, 0.0, 0.0, 9.0)),
            VertexXyzm::new(1.0, 2.0, 3.0, 9.0)
        );
    }

    #[test]
    fn scale_multiplies_ordinates() {
        let m = AffineMatrix::scale(2.0, 3.0, 4.0);
        assert_eq!(
            m.apply_xyz(&VertexXyzm::new(1.0, 1.0, 1.0, 1.0)),
            VertexXyzm::new(2.0, 3.0, 4.0, 1.0)
        );
    }

    #[test]
    fn rotate_z_quarter_turn() {
        let m = AffineMatrix::rotate_z(std::f64::consts::FRAC_PI_2);
        let v = m.apply_xy(&VertexXy::new(1.0, 0.0));
        assert_abs_diff_eq!(v.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rotate_x_moves_z() {
        let m = AffineMatrix::rotate_x(std::f64::consts::FRAC_PI_2);
        let v = m.apply_xyz(&VertexXyzm::new(0.0, 1.0, 0.0, 0.0));
        assert_abs_diff_eq!(v.y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn translate_scale_scales_then_translates() {
        let m = AffineMatrix::translate_scale(10.0, 20.0, 30.0, 2.0, 2.0, 2.0);
        assert_eq!(
            m.apply_xyz(&VertexXyzm::new(1.0, 1.0, 1.0, 0.0)),
            VertexXyzm::new(12.0, 22.0, 32.0, 0.0)
        );
    }
}
