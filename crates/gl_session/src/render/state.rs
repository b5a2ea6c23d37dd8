//! Baseline render state

/// RGBA color with channels in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel
    pub a: f32,
}

impl Rgba {
    /// Transparent black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a color
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Shading model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadeModel {
    /// Flat shading
    Flat,
    /// Gouraud shading
    Smooth,
}

/// Depth comparison function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthFunc {
    /// Pass when the incoming depth is less than the stored depth
    Less,
    /// Pass when the incoming depth is less than or equal to the stored depth
    LessOrEqual,
}

/// Perspective correction quality hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerspectiveHint {
    /// Let the driver decide
    DontCare,
    /// Fastest option
    Fastest,
    /// Highest quality option
    Nicest,
}

/// Render state applied when a session goes live
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    /// Shading model
    pub shade_model: ShadeModel,
    /// Background color
    pub clear_color: Rgba,
    /// Depth buffer clear value
    pub clear_depth: f64,
    /// Whether depth testing is enabled
    pub depth_test: bool,
    /// Depth comparison
    pub depth_func: DepthFunc,
    /// Perspective correction hint
    pub perspective_hint: PerspectiveHint,
}

impl RenderState {
    /// Smooth shading, black background, depth test with less-or-equal,
    /// nicest perspective correction
    pub const BASELINE: Self = Self {
        shade_model: ShadeModel::Smooth,
        clear_color: Rgba::BLACK,
        clear_depth: 1.0,
        depth_test: true,
        depth_func: DepthFunc::LessOrEqual,
        perspective_hint: PerspectiveHint::Nicest,
    };
}

impl Default for RenderState {
    fn default() -> Self {
        Self::BASELINE
    }
}
