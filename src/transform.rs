//! Homogeneous transform builders.
//!
//! All builders are pure: the same inputs always produce bit-identical
//! matrices. The convention throughout the crate is column-major matrices
//! acting on column vectors with right-multiplication, so a model matrix
//! composed as `M = T * R * S` scales first, rotates second and translates
//! last when applied as `v' = M * v`. That order is load-bearing: swapping
//! it moves the visual center of rotation.

use cgmath::{Deg, InnerSpace, Matrix4, Point3, SquareMatrix, Vector3, Vector4};

use crate::error::RenderError;

/// cgmath (like OpenGL) produces clip-space depth in [-1, 1]; wgpu expects
/// [0, 1]. Every projection goes through this correction.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::from_cols(
    Vector4::new(1.0, 0.0, 0.0, 0.0),
    Vector4::new(0.0, 1.0, 0.0, 0.0),
    Vector4::new(0.0, 0.0, 0.5, 0.0),
    Vector4::new(0.0, 0.0, 0.5, 1.0),
);

/// Symmetric-frustum perspective projection.
///
/// `fovy_deg` is the full vertical field of view in degrees. The result is
/// degenerate when `fovy_deg` is non-positive or `near == far`; callers
/// validate their inputs before building a projection.
pub fn perspective(
        fovy_deg: f32,
        aspect: f32,
        near: f32,
        far: f32,
) -> Matrix4<f32>
{
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(Deg(fovy_deg), aspect, near, far)
}

/// View matrix for a camera at `eye` looking at `center`.
///
/// Undefined when `center == eye` or `up` is parallel to the view
/// direction (the basis cross products degenerate); callers guard against
/// those inputs.
pub fn look_at(
        eye: Point3<f32>,
        center: Point3<f32>,
        up: Vector3<f32>,
) -> Matrix4<f32>
{
        Matrix4::look_at_rh(eye, center, up)
}

pub fn translate(v: Vector3<f32>) -> Matrix4<f32>
{
        Matrix4::from_translation(v)
}

pub fn scale(v: Vector3<f32>) -> Matrix4<f32>
{
        Matrix4::from_nonuniform_scale(v.x, v.y, v.z)
}

/// Axis-angle rotation, `angle_deg` in degrees.
///
/// The axis is normalized internally; a zero-length axis is rejected with
/// [`RenderError::InvalidAxis`]. Sign convention: positive angles turn +X
/// toward +Z about the +Y axis, so `rotate(90.0, unit_y())` maps (1,0,0)
/// to (0,0,1). cgmath's axis-angle constructor turns the opposite way,
/// hence the negation.
pub fn rotate(
        angle_deg: f32,
        axis: Vector3<f32>,
) -> Result<Matrix4<f32>, RenderError>
{
        if axis.magnitude2() == 0.0
        {
                return Err(RenderError::InvalidAxis);
        }

        Ok(Matrix4::from_axis_angle(axis.normalize(), Deg(-angle_deg)))
}

/// Identity transform, the model matrix of an unrotated solid.
pub fn identity() -> Matrix4<f32>
{
        Matrix4::identity()
}

#[cfg(test)]
mod tests
{
        use super::*;
        use cgmath::Transform;

        const TOLERANCE: f32 = 1e-5;

        fn assert_matrix_near(
                actual: Matrix4<f32>,
                expected: Matrix4<f32>,
        )
        {
                let a: [[f32; 4]; 4] = actual.into();
                let e: [[f32; 4]; 4] = expected.into();

                for (col_a, col_e) in a.iter().zip(e.iter())
                {
                        for (va, ve) in col_a.iter().zip(col_e.iter())
                        {
                                assert!(
                                        (va - ve).abs() < TOLERANCE,
                                        "matrices differ: {:?} vs {:?}",
                                        a,
                                        e
                                );
                        }
                }
        }

        #[test]
        fn zero_rotation_is_identity()
        {
                for axis in [
                        Vector3::unit_x(),
                        Vector3::unit_y(),
                        Vector3::unit_z(),
                        Vector3::new(1.0, 1.0, 1.0),
                ]
                {
                        let m = rotate(0.0, axis).unwrap();
                        assert_matrix_near(m, Matrix4::identity());
                }
        }

        #[test]
        fn quarter_turn_about_y_sends_x_to_z()
        {
                let m = rotate(90.0, Vector3::unit_y()).unwrap();
                let p = m.transform_point(Point3::new(1.0, 0.0, 0.0));

                assert!((p.x - 0.0).abs() < TOLERANCE);
                assert!((p.y - 0.0).abs() < TOLERANCE);
                assert!((p.z - 1.0).abs() < TOLERANCE);
        }

        #[test]
        fn zero_axis_is_rejected()
        {
                let err = rotate(45.0, Vector3::new(0.0, 0.0, 0.0)).unwrap_err();
                assert!(matches!(err, RenderError::InvalidAxis));
        }

        #[test]
        fn axis_is_normalized_internally()
        {
                let unit = rotate(30.0, Vector3::unit_y()).unwrap();
                let scaled = rotate(30.0, Vector3::new(0.0, 10.0, 0.0)).unwrap();
                assert_matrix_near(unit, scaled);
        }

        #[test]
        fn composition_scales_then_rotates_then_translates()
        {
                let m = translate(Vector3::new(0.0, 0.0, 5.0))
                        * rotate(90.0, Vector3::unit_y()).unwrap()
                        * scale(Vector3::new(2.0, 2.0, 2.0));

                // (1,0,0) -> scaled (2,0,0) -> rotated (0,0,2) -> moved (0,0,7)
                let p = m.transform_point(Point3::new(1.0, 0.0, 0.0));

                assert!((p.x - 0.0).abs() < TOLERANCE);
                assert!((p.y - 0.0).abs() < TOLERANCE);
                assert!((p.z - 7.0).abs() < TOLERANCE);
        }

        #[test]
        fn builders_are_pure()
        {
                let a: [[f32; 4]; 4] = perspective(45.0, 1.0, 0.1, 100.0).into();
                let b: [[f32; 4]; 4] = perspective(45.0, 1.0, 0.1, 100.0).into();
                assert_eq!(a, b);

                let eye = Point3::new(0.0, 0.0, 3.0);
                let center = Point3::new(0.0, 0.0, 0.0);
                let up = Vector3::unit_y();
                let v1: [[f32; 4]; 4] = look_at(eye, center, up).into();
                let v2: [[f32; 4]; 4] = look_at(eye, center, up).into();
                assert_eq!(v1, v2);
        }

        #[test]
        fn perspective_applies_depth_range_correction()
        {
                let with = perspective(45.0, 1.0, 0.1, 100.0);
                let raw = cgmath::perspective(Deg(45.0), 1.0, 0.1, 100.0);
                assert_matrix_near(with, OPENGL_TO_WGPU_MATRIX * raw);
        }
}
