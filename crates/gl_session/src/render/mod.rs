//! # Rendering
//!
//! The fixed-function surface the demos draw through. Nothing here issues OS
//! calls on its own: the platform backend implements [`Renderer`] against the
//! bound OpenGL context, and the headless backend records the calls instead.
//!
//! - **Projection**: viewport plus perspective matrix for a client size
//! - **Render state**: baseline state applied once per live session
//! - **Renderer**: immediate-mode calls used by the demo scenes

pub mod projection;
pub mod state;

pub use projection::{Projection, Viewport, FIELD_OF_VIEW_DEGREES, NEAR_PLANE, FAR_PLANE};
pub use state::{DepthFunc, PerspectiveHint, RenderState, Rgba, ShadeModel};

use crate::foundation::math::Vec3;

/// Primitive topology for an immediate-mode batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Independent triangles
    Triangles,
    /// Independent quads
    Quads,
}

/// Vertex with a per-vertex color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColoredVertex {
    /// Position in model space
    pub position: Vec3,
    /// Vertex color (RGB)
    pub color: Vec3,
}

impl ColoredVertex {
    /// Create a colored vertex
    pub fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self {
            position: Vec3::from(position),
            color: Vec3::from(color),
        }
    }
}

/// Fixed-function drawing calls issued against the current context
pub trait Renderer {
    /// Load viewport and projection matrix, then reset the model-view matrix
    fn apply_projection(&mut self, projection: &Projection);

    /// Apply baseline render state
    fn apply_render_state(&mut self, state: &RenderState);

    /// Set the color used by [`Renderer::clear`]
    fn set_clear_color(&mut self, color: Rgba);

    /// Clear the color and depth buffers
    fn clear(&mut self);

    /// Reset the model-view matrix
    fn load_identity(&mut self);

    /// Multiply the model-view matrix by a translation
    fn translate(&mut self, offset: Vec3);

    /// Multiply the model-view matrix by a rotation of `degrees` about `axis`
    fn rotate(&mut self, degrees: f32, axis: Vec3);

    /// Draw one immediate-mode batch
    fn draw(&mut self, primitive: Primitive, vertices: &[ColoredVertex]);
}
