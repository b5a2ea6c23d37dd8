//! Application trait and lifecycle management

use thiserror::Error;

use crate::input::KeyboardState;
use crate::render::Renderer;

/// Application lifecycle trait
///
/// Implement this trait to drive a scene from [`Engine::run`](crate::Engine::run).
pub trait Application {
    /// Set up render state for a freshly acquired session
    ///
    /// Called after the first acquisition and again after every display mode
    /// switch, since the new context starts from the baseline render state.
    fn initialize(&mut self, renderer: &mut dyn Renderer) -> Result<(), AppError>;

    /// Draw one frame
    ///
    /// The engine swaps buffers afterwards.
    fn render(&mut self, renderer: &mut dyn Renderer) -> Result<(), AppError>;

    /// Apply key-driven parameter changes
    ///
    /// Called once per drawn frame, after the engine has handled its own keys.
    /// Use [`KeyboardState::take`] for actions that should fire once per press.
    fn update(&mut self, keys: &mut KeyboardState) -> Result<(), AppError>;

    /// Called once when the run loop exits, before the session is released
    ///
    /// Not called when launch fails.
    fn cleanup(&mut self) {}
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}
