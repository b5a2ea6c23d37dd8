//! Math utilities and types
//!
//! Thin aliases over `nalgebra` used by the projection and scene code.

pub use nalgebra::{Matrix4, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type (column-major, the layout `glLoadMatrixf` expects)
pub type Mat4 = Matrix4<f32>;

/// Convert degrees to radians
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Build an OpenGL perspective projection matrix
///
/// Produces the same matrix as `gluPerspective`: right-handed eye space,
/// clip-space depth in [-1, 1]. Like GLU, a degenerate request (zero aspect,
/// zero field of view or `near == far`) yields the identity matrix.
#[rustfmt::skip]
pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let half_fov = deg_to_rad(fov_y_degrees) / 2.0;
    let depth = far - near;
    if aspect == 0.0 || half_fov.sin() == 0.0 || depth == 0.0 {
        return Mat4::identity();
    }

    let f = half_fov.cos() / half_fov.sin();
    Mat4::new(
        f / aspect, 0.0, 0.0, 0.0,
        0.0, f, 0.0, 0.0,
        0.0, 0.0, -(far + near) / depth, -2.0 * near * far / depth,
        0.0, 0.0, -1.0, 0.0,
    )
}
