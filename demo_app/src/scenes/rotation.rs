//! Spinning triangle and quad
//!
//! The triangle turns about Y, the quad about X in the opposite sense. Each
//! angle advances after its shape is drawn; T reverses both.

use gl_session::foundation::math::Vec3;
use gl_session::input::{Key, KeyboardState};
use gl_session::render::{ColoredVertex, Primitive, Renderer};
use gl_session::{AppError, Application};

/// Triangle angle increment per frame, in degrees
pub const TRIANGLE_SPEED: f32 = 0.2;

/// Quad angle decrement per frame, in degrees
pub const QUAD_SPEED: f32 = 0.15;

const FULL_TURN: f32 = 360.0;

/// Two rotating polygons in front of the camera
#[derive(Debug, Clone)]
pub struct PolygonRotationScene {
    triangle_angle: f32,
    quad_angle: f32,
    direction: f32,
    triangle: [ColoredVertex; 3],
    quad: [ColoredVertex; 4],
}

impl PolygonRotationScene {
    /// Scene with both angles at zero, turning forwards
    pub fn new() -> Self {
        const QUAD_COLOR: [f32; 3] = [0.5, 0.5, 1.0];
        Self {
            triangle_angle: 0.0,
            quad_angle: 0.0,
            direction: 1.0,
            triangle: [
                ColoredVertex::new([0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
                ColoredVertex::new([-1.0, -1.0, 0.0], [0.0, 1.0, 0.0]),
                ColoredVertex::new([1.0, -1.0, 0.0], [0.0, 0.0, 1.0]),
            ],
            quad: [
                ColoredVertex::new([-1.0, 1.0, 0.0], QUAD_COLOR),
                ColoredVertex::new([1.0, 1.0, 0.0], QUAD_COLOR),
                ColoredVertex::new([1.0, -1.0, 0.0], QUAD_COLOR),
                ColoredVertex::new([-1.0, -1.0, 0.0], QUAD_COLOR),
            ],
        }
    }

    /// Triangle angle in degrees
    pub const fn triangle_angle(&self) -> f32 {
        self.triangle_angle
    }

    /// Quad angle in degrees
    pub const fn quad_angle(&self) -> f32 {
        self.quad_angle
    }

    /// 1 when turning forwards, -1 when reversed
    pub const fn direction(&self) -> f32 {
        self.direction
    }

    /// Reverse both rotations
    pub fn reverse(&mut self) {
        self.direction = -self.direction;
        log::debug!("Rotation direction now {}", self.direction);
    }

    fn advance(&mut self) {
        // Wrap checks run before the step, so an angle may overshoot by one step
        if self.triangle_angle >= FULL_TURN {
            self.triangle_angle = 0.0;
        }
        self.triangle_angle += TRIANGLE_SPEED * self.direction;

        if self.quad_angle <= -FULL_TURN {
            self.quad_angle = 0.0;
        }
        self.quad_angle -= QUAD_SPEED * self.direction;
    }
}

impl Default for PolygonRotationScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Application for PolygonRotationScene {
    fn initialize(&mut self, _renderer: &mut dyn Renderer) -> Result<(), AppError> {
        Ok(())
    }

    fn render(&mut self, renderer: &mut dyn Renderer) -> Result<(), AppError> {
        renderer.clear();

        renderer.load_identity();
        renderer.translate(Vec3::new(-1.5, 0.0, -6.0));
        renderer.rotate(self.triangle_angle, Vec3::y());
        renderer.draw(Primitive::Triangles, &self.triangle);

        renderer.load_identity();
        renderer.translate(Vec3::new(1.5, 0.0, -6.0));
        renderer.rotate(self.quad_angle, Vec3::x());
        renderer.draw(Primitive::Quads, &self.quad);

        self.advance();
        Ok(())
    }

    fn update(&mut self, keys: &mut KeyboardState) -> Result<(), AppError> {
        if let Some(toggle) = Key::from_char('T') {
            if keys.take(toggle) {
                self.reverse();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use gl_session::platform::headless::{DrawCall, HeadlessBackend};

    #[test]
    fn test_angles_advance_after_draw() {
        let mut backend = HeadlessBackend::new();
        let mut scene = PolygonRotationScene::new();

        scene.render(&mut backend).unwrap();

        assert_relative_eq!(scene.triangle_angle(), TRIANGLE_SPEED);
        assert_relative_eq!(scene.quad_angle(), -QUAD_SPEED);
    }

    #[test]
    fn test_triangle_wraps_after_full_turn() {
        let mut scene = PolygonRotationScene::new();
        scene.triangle_angle = 360.1;
        scene.quad_angle = -360.05;

        scene.advance();

        assert_relative_eq!(scene.triangle_angle(), TRIANGLE_SPEED);
        assert_relative_eq!(scene.quad_angle(), -QUAD_SPEED);
    }

    #[test]
    fn test_no_wrap_below_full_turn() {
        let mut scene = PolygonRotationScene::new();
        scene.triangle_angle = 359.9;

        scene.advance();

        assert_relative_eq!(scene.triangle_angle(), 360.1, epsilon = 1e-3);
    }

    #[test]
    fn test_t_reverses_once_per_press() {
        let mut scene = PolygonRotationScene::new();
        let mut keys = KeyboardState::new();
        keys.set(Key::from_char('t').unwrap(), true);

        scene.update(&mut keys).unwrap();
        scene.update(&mut keys).unwrap();

        assert_relative_eq!(scene.direction(), -1.0);

        scene.advance();
        assert_relative_eq!(scene.triangle_angle(), -TRIANGLE_SPEED);
        assert_relative_eq!(scene.quad_angle(), QUAD_SPEED);
    }

    #[test]
    fn test_frame_draw_calls() {
        use gl_session::config::SessionConfig;
        use gl_session::session::{DisplayMode, DisplaySession, FallbackDecision};

        let mut backend = HeadlessBackend::new();
        let mut session = DisplaySession::new(SessionConfig::new("Polygon Rotation"));
        session
            .acquire(&mut backend, DisplayMode::Windowed, &mut FallbackDecision::Abort)
            .unwrap();
        backend.clear_journal();

        let mut scene = PolygonRotationScene::new();
        scene.render(&mut backend).unwrap();

        let draws = backend.draws();
        assert_eq!(draws.len(), 9);
        assert_eq!(draws[0], DrawCall::Clear);
        assert_eq!(draws[1], DrawCall::LoadIdentity);
        assert_eq!(draws[2], DrawCall::Translate(Vec3::new(-1.5, 0.0, -6.0)));
        assert_eq!(draws[3], DrawCall::Rotate(0.0, Vec3::y()));
        match &draws[4] {
            DrawCall::Draw(Primitive::Triangles, vertices) => {
                assert_eq!(vertices.len(), 3);
                assert_eq!(vertices[0].color, Vec3::new(1.0, 0.0, 0.0));
                assert_eq!(vertices[2].position, Vec3::new(1.0, -1.0, 0.0));
            }
            other => panic!("expected triangle batch, got {other:?}"),
        }
        assert_eq!(draws[6], DrawCall::Translate(Vec3::new(1.5, 0.0, -6.0)));
        assert_eq!(draws[7], DrawCall::Rotate(0.0, Vec3::x()));
        match &draws[8] {
            DrawCall::Draw(Primitive::Quads, vertices) => {
                assert_eq!(vertices.len(), 4);
                assert!(vertices.iter().all(|v| v.color == Vec3::new(0.5, 0.5, 1.0)));
            }
            other => panic!("expected quad batch, got {other:?}"),
        }

        session.release(&mut backend);
    }
}
