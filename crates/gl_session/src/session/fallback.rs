//! User-facing decisions consulted by the lifecycle
//!
//! The session never shows a dialog itself. When full-screen is unavailable it
//! asks an injected [`FallbackPolicy`]; the run loop additionally uses a
//! [`Prompt`] for the launch mode and for reporting teardown failures.

use super::backend::VideoMode;
use super::DisplayMode;

/// Answer to "full-screen is not supported, continue in a window?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackDecision {
    /// Continue the acquisition in windowed mode
    ContinueWindowed,
    /// Abort the acquisition
    Abort,
}

/// Decides what happens when a full-screen mode change is rejected
pub trait FallbackPolicy {
    /// Called once per rejected mode change
    fn on_fullscreen_unsupported(&mut self, mode: VideoMode) -> FallbackDecision;
}

impl FallbackPolicy for FallbackDecision {
    fn on_fullscreen_unsupported(&mut self, _mode: VideoMode) -> FallbackDecision {
        *self
    }
}

/// Dialog collaborator used by the run loop
pub trait Prompt: FallbackPolicy {
    /// Ask which mode the first session should use
    fn choose_launch_mode(&mut self) -> DisplayMode;

    /// Show an informational error
    fn report_error(&mut self, message: &str);
}

/// Prompt with canned answers
///
/// Records every reported error; handy for tests and for unattended runs.
#[derive(Debug, Clone)]
pub struct ScriptedPrompt {
    /// Launch mode returned by [`Prompt::choose_launch_mode`]
    pub launch_mode: DisplayMode,
    /// Answer given when full-screen is unsupported
    pub fallback: FallbackDecision,
    /// Number of fallback questions asked
    pub fallback_questions: usize,
    /// Errors reported so far
    pub errors: Vec<String>,
}

impl ScriptedPrompt {
    /// Prompt answering `launch_mode` and `fallback`
    pub const fn new(launch_mode: DisplayMode, fallback: FallbackDecision) -> Self {
        Self {
            launch_mode,
            fallback,
            fallback_questions: 0,
            errors: Vec::new(),
        }
    }
}

impl FallbackPolicy for ScriptedPrompt {
    fn on_fullscreen_unsupported(&mut self, mode: VideoMode) -> FallbackDecision {
        self.fallback_questions += 1;
        log::debug!("Scripted fallback for {}: {:?}", mode, self.fallback);
        self.fallback
    }
}

impl Prompt for ScriptedPrompt {
    fn choose_launch_mode(&mut self) -> DisplayMode {
        self.launch_mode
    }

    fn report_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}
