//! Session configuration
//!
//! Everything needed to bring a display session up: window title and class,
//! client-area sizes per display mode, color depth, and how the launch mode
//! is chosen.

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::session::DisplayMode;

/// Color depths a pixel format may be requested with
pub const SUPPORTED_COLOR_DEPTHS: [u8; 3] = [16, 24, 32];

/// Client-area size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Extent {
    /// Create a new extent
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// How the display mode for the first session is picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LaunchMode {
    /// Ask the user through the prompt collaborator
    #[default]
    Ask,
    /// Start windowed without asking
    Windowed,
    /// Start full-screen without asking
    FullScreen,
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Window class name registered with the OS
    pub class_name: String,
    /// Window title
    pub title: String,
    /// Client size used in windowed mode
    pub windowed: Extent,
    /// Display resolution requested in full-screen mode
    pub fullscreen: Extent,
    /// Bits per pixel for both the color and the depth buffer
    pub color_depth: u8,
    /// Launch mode policy
    pub launch: LaunchMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            class_name: "OpenGlWindow".to_string(),
            title: "OpenGL Window".to_string(),
            windowed: Extent::new(640, 480),
            fullscreen: Extent::new(640, 480),
            color_depth: 32,
            launch: LaunchMode::Ask,
        }
    }
}

impl Config for SessionConfig {}

impl SessionConfig {
    /// Create a configuration with the given title and default sizes
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the full-screen resolution
    #[must_use]
    pub fn with_fullscreen_extent(mut self, extent: Extent) -> Self {
        self.fullscreen = extent;
        self
    }

    /// Set the windowed client size
    #[must_use]
    pub fn with_windowed_extent(mut self, extent: Extent) -> Self {
        self.windowed = extent;
        self
    }

    /// Set the launch mode policy
    #[must_use]
    pub fn with_launch(mut self, launch: LaunchMode) -> Self {
        self.launch = launch;
        self
    }

    /// Client size requested for `mode`
    pub const fn extent_for(&self, mode: DisplayMode) -> Extent {
        match mode {
            DisplayMode::Windowed => self.windowed,
            DisplayMode::FullScreen => self.fullscreen,
        }
    }

    /// Check that every value can drive a session
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, extent) in [("windowed", self.windowed), ("fullscreen", self.fullscreen)] {
            if extent.width == 0 || extent.height == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} extent must be non-zero, got {}x{}",
                    extent.width, extent.height
                )));
            }
            if i32::try_from(extent.width).is_err() || i32::try_from(extent.height).is_err() {
                return Err(ConfigError::Invalid(format!(
                    "{name} extent {}x{} exceeds {}",
                    extent.width,
                    extent.height,
                    i32::MAX
                )));
            }
        }
        if !SUPPORTED_COLOR_DEPTHS.contains(&self.color_depth) {
            return Err(ConfigError::Invalid(format!(
                "color depth {} is not one of {:?}",
                self.color_depth, SUPPORTED_COLOR_DEPTHS
            )));
        }
        if self.class_name.is_empty() {
            return Err(ConfigError::Invalid("class name must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.windowed, Extent::new(640, 480));
        assert_eq!(config.color_depth, 32);
    }

    #[test]
    fn test_extent_for_mode() {
        let config = SessionConfig::new("Polygon Rotation")
            .with_fullscreen_extent(Extent::new(1366, 768));

        assert_eq!(config.extent_for(DisplayMode::Windowed), Extent::new(640, 480));
        assert_eq!(config.extent_for(DisplayMode::FullScreen), Extent::new(1366, 768));
    }

    #[test]
    fn test_rejects_zero_extent() {
        let config = SessionConfig::default().with_windowed_extent(Extent::new(0, 480));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_extent_beyond_screen_coordinates() {
        let config = SessionConfig::default().with_fullscreen_extent(Extent::new(1366, u32::MAX));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = SessionConfig::default().with_windowed_extent(Extent::new(u32::try_from(i32::MAX).unwrap(), 480));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_unsupported_depth() {
        let config = SessionConfig {
            color_depth: 8,
            ..SessionConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: SessionConfig = toml::from_str(
            r#"
            title = "Polygon Rotation"
            launch = "Windowed"

            [fullscreen]
            width = 1366
            height = 768
            "#,
        )
        .unwrap();

        assert_eq!(config.title, "Polygon Rotation");
        assert_eq!(config.launch, LaunchMode::Windowed);
        assert_eq!(config.fullscreen, Extent::new(1366, 768));
        assert_eq!(config.windowed, Extent::new(640, 480));
        assert_eq!(config.color_depth, 32);
    }

    #[test]
    fn test_ron_file_roundtrip_through_disk() {
        let path = std::env::temp_dir().join(format!("gl_session_config_{}.ron", std::process::id()));
        let config = SessionConfig::new("Empty Window").with_launch(LaunchMode::FullScreen);

        config.save_to_file(&path).unwrap();
        let loaded = SessionConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let result = SessionConfig::load_from_file("session.yaml");
        // Missing file is reported before the extension is considered
        assert!(matches!(result, Err(ConfigError::Io(_))));

        let result = SessionConfig::default().save_to_file("session.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_files_fall_back() {
        let fallback = SessionConfig::new("Fallback").with_fullscreen_extent(Extent::new(1366, 768));
        let config = SessionConfig::load_first_or(&["does/not/exist.toml"], fallback.clone());
        assert_eq!(config, fallback);
    }
}
