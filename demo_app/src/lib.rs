//! Demo scenes driven by the `gl_session` run loop
//!
//! - **empty window**: clear color adjustable from the keyboard
//! - **polygon rotation**: a spinning triangle and quad

pub mod scenes;

use gl_session::config::{Config, SessionConfig};
use gl_session::foundation::logging;

/// Logging plus configuration for a demo binary
///
/// Looks for `<name>.toml`, then `<name>.ron`, in the working directory and
/// falls back to `defaults` when neither loads.
pub fn bootstrap(name: &str, defaults: SessionConfig) -> SessionConfig {
    logging::init();
    log::info!("Starting {}", name);

    let candidates = [format!("{name}.toml"), format!("{name}.ron")];
    SessionConfig::load_first_or(&candidates, defaults)
}
