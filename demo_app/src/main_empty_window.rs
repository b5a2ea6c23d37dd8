//! Empty OpenGL window
//!
//! Asks for the launch mode, then shows a blank window whose background color
//! is driven by R/G/B/A + Up/Down. F11 toggles full-screen, Escape quits.

use gl_session::config::SessionConfig;

fn defaults() -> SessionConfig {
    SessionConfig::new("OpenGL Empty Window")
}

#[cfg(windows)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use demo_app::scenes::ClearColorScene;
    use gl_session::platform::{MessageBoxPrompt, Win32Backend};
    use gl_session::Engine;

    let config = demo_app::bootstrap("empty_window", defaults());
    let mut engine = Engine::new(config, Win32Backend::new());
    engine.run(&mut MessageBoxPrompt, &mut ClearColorScene::new())?;

    log::info!("Empty window demo finished");
    Ok(())
}

#[cfg(not(windows))]
fn main() -> std::process::ExitCode {
    let config = demo_app::bootstrap("empty_window", defaults());
    log::error!(
        "'{}' needs the Win32 backend; nothing to show on this platform",
        config.title
    );
    std::process::ExitCode::FAILURE
}
