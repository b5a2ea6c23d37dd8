//! # GL Session
//!
//! Window and OpenGL context lifecycle management with windowed/full-screen
//! switching.
//!
//! ## Features
//!
//! - **Display sessions**: all-or-nothing acquisition of window, device
//!   context and rendering context, with reverse-order best-effort release
//! - **Mode switching**: windowed and exclusive full-screen, with a
//!   user-confirmed fallback when a display mode is rejected
//! - **Headless backend**: resource-accounting fake with fault injection
//! - **Win32 backend**: native windows and WGL on Windows
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gl_session::prelude::*;
//!
//! struct Blank;
//!
//! impl Application for Blank {
//!     fn initialize(&mut self, renderer: &mut dyn Renderer) -> Result<(), AppError> {
//!         renderer.set_clear_color(Rgba::BLACK);
//!         Ok(())
//!     }
//!
//!     fn render(&mut self, renderer: &mut dyn Renderer) -> Result<(), AppError> {
//!         renderer.clear();
//!         renderer.load_identity();
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, _keys: &mut KeyboardState) -> Result<(), AppError> {
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SessionConfig::new("Blank").with_launch(LaunchMode::Windowed);
//!     let mut prompt = ScriptedPrompt::new(DisplayMode::Windowed, FallbackDecision::ContinueWindowed);
//!     let mut engine = Engine::new(config, HeadlessBackend::new());
//!     engine.run(&mut prompt, &mut Blank)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod input;
pub mod platform;
pub mod render;
pub mod session;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use engine::{Engine, EngineError};

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        config::{Config, Extent, LaunchMode, SessionConfig},
        foundation::math::{Mat4, Vec3},
        input::{Key, KeyboardState, WindowEvent},
        platform::HeadlessBackend,
        render::{ColoredVertex, Primitive, Renderer, Rgba},
        session::{
            DisplayBackend, DisplayMode, DisplaySession, FallbackDecision, FallbackPolicy, Prompt, ScriptedPrompt,
        },
        AppError, Application, Engine, EngineError,
    };

    #[cfg(windows)]
    pub use crate::platform::{MessageBoxPrompt, Win32Backend};
}
