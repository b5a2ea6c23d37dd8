//! Scenes implementing [`gl_session::Application`]

pub mod background;
pub mod rotation;

pub use background::{Channel, ClearColorScene, CHANNEL_STEP};
pub use rotation::{PolygonRotationScene, QUAD_SPEED, TRIANGLE_SPEED};
