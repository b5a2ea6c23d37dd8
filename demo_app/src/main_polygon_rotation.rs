//! Rotating triangle and quad
//!
//! Full-screen runs at 1366x768 unless configured otherwise. T reverses the
//! rotation, F11 toggles full-screen, Escape quits.

use gl_session::config::{Extent, SessionConfig};

fn defaults() -> SessionConfig {
    SessionConfig::new("Polygon Rotation").with_fullscreen_extent(Extent::new(1366, 768))
}

#[cfg(windows)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use demo_app::scenes::PolygonRotationScene;
    use gl_session::platform::{MessageBoxPrompt, Win32Backend};
    use gl_session::Engine;

    let config = demo_app::bootstrap("polygon_rotation", defaults());
    let mut engine = Engine::new(config, Win32Backend::new());
    engine.run(&mut MessageBoxPrompt, &mut PolygonRotationScene::new())?;

    log::info!("Polygon rotation demo finished");
    Ok(())
}

#[cfg(not(windows))]
fn main() -> std::process::ExitCode {
    let config = demo_app::bootstrap("polygon_rotation", defaults());
    log::error!(
        "'{}' needs the Win32 backend; nothing to show on this platform",
        config.title
    );
    std::process::ExitCode::FAILURE
}
