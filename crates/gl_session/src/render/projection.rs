//! Viewport and perspective setup for a client area

use crate::foundation::math::{self, Mat4};

/// Vertical field of view in degrees
pub const FIELD_OF_VIEW_DEGREES: f32 = 45.0;

/// Near clipping plane distance
pub const NEAR_PLANE: f32 = 0.1;

/// Far clipping plane distance
pub const FAR_PLANE: f32 = 100.0;

/// Viewport rectangle in window pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Left edge
    pub x: i32,
    /// Bottom edge
    pub y: i32,
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

/// Viewport plus projection matrix for one client size
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Viewport covering the client area
    pub viewport: Viewport,
    /// Width / height ratio used by the matrix
    pub aspect: f32,
    /// Perspective matrix, column-major
    pub matrix: Mat4,
}

impl Projection {
    /// Projection for a client area of `width` x `height`
    ///
    /// A zero height is treated as 1 so the aspect ratio stays finite.
    pub fn for_client(width: u32, height: u32) -> Self {
        let height = height.max(1);
        let aspect = width as f32 / height as f32;

        Self {
            viewport: Viewport {
                x: 0,
                y: 0,
                width,
                height,
            },
            aspect,
            matrix: math::perspective(FIELD_OF_VIEW_DEGREES, aspect, NEAR_PLANE, FAR_PLANE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_aspect_from_client_size() {
        let projection = Projection::for_client(640, 480);

        assert_relative_eq!(projection.aspect, 640.0 / 480.0);
        assert_eq!(projection.viewport, Viewport { x: 0, y: 0, width: 640, height: 480 });
    }

    #[test]
    fn test_zero_height_uses_one() {
        let projection = Projection::for_client(800, 0);

        assert_eq!(projection.viewport.height, 1);
        assert_relative_eq!(projection.aspect, 800.0);
        assert!(projection.matrix.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_zero_width_is_finite() {
        let projection = Projection::for_client(0, 0);

        assert_relative_eq!(projection.aspect, 0.0);
        assert_eq!(projection.viewport.width, 0);
        assert_eq!(projection.matrix, Mat4::identity());
    }
}
