//! Core run loop
//!
//! [`Engine`] owns the backend, the display session and the input state, and
//! drives an [`Application`] until Escape, a close request or an error.

use thiserror::Error;

use crate::application::{AppError, Application};
use crate::config::{LaunchMode, SessionConfig};
use crate::input::{InputState, Key, WindowEvent};
use crate::session::{DisplayBackend, DisplayMode, DisplaySession, Prompt, ReleaseReport, SessionError, SwitchError};

/// Main engine struct
pub struct Engine<B: DisplayBackend> {
    backend: B,
    session: DisplaySession<B>,
    input: InputState,
    running: bool,
}

impl<B: DisplayBackend> Engine<B> {
    /// Create an engine with an unacquired session
    pub fn new(config: SessionConfig, backend: B) -> Self {
        Self {
            backend,
            session: DisplaySession::new(config),
            input: InputState::new(),
            running: false,
        }
    }

    /// Launch, loop until done, then release
    ///
    /// The session is released whether the loop ended normally or with an
    /// error. [`Application::cleanup`] runs only after a successful launch.
    pub fn run<P: Prompt, A: Application>(&mut self, prompt: &mut P, app: &mut A) -> Result<(), EngineError> {
        let result = self.launch(prompt, app).and_then(|()| {
            let looped = self.main_loop(prompt, app);
            app.cleanup();
            looped
        });

        let report = self.session.release(&mut self.backend);
        Self::report_teardown(prompt, &report);

        match &result {
            Ok(()) => log::info!("Engine shutdown complete"),
            Err(e) => log::error!("Engine stopped: {}", e),
        }
        result
    }

    /// Pick the launch mode, acquire the session and initialize the application
    pub fn launch<P: Prompt, A: Application>(&mut self, prompt: &mut P, app: &mut A) -> Result<(), EngineError> {
        let mode = match self.session.config().launch {
            LaunchMode::Ask => prompt.choose_launch_mode(),
            LaunchMode::Windowed => DisplayMode::Windowed,
            LaunchMode::FullScreen => DisplayMode::FullScreen,
        };

        if let Err(e) = self.session.acquire(&mut self.backend, mode, &mut *prompt) {
            Self::report_session_error(prompt, &e);
            return Err(EngineError::Acquire(e));
        }

        app.initialize(&mut self.backend)?;
        self.input = InputState::new();
        self.running = true;
        Ok(())
    }

    fn main_loop<P: Prompt, A: Application>(&mut self, prompt: &mut P, app: &mut A) -> Result<(), EngineError> {
        log::info!("Starting main loop...");
        while self.running {
            self.step(prompt, app)?;
        }
        Ok(())
    }

    /// One loop iteration
    ///
    /// Handles one pending event if there is one; otherwise draws a frame
    /// while active, or blocks for the next message while minimized.
    pub fn step<P: Prompt, A: Application>(&mut self, prompt: &mut P, app: &mut A) -> Result<(), EngineError> {
        if let Some(event) = self.backend.poll_event() {
            self.handle_event(event);
            return Ok(());
        }

        if !self.input.is_active() {
            self.backend.wait_event();
            return Ok(());
        }

        if self.input.keys.is_down(Key::ESCAPE) {
            log::info!("Escape pressed, leaving main loop");
            self.running = false;
            return Ok(());
        }

        app.render(&mut self.backend)?;
        if let Err(e) = self.session.present(&mut self.backend) {
            log::warn!("Buffer swap failed: {}", e);
        }

        if self.input.keys.take(Key::F11) {
            self.toggle_display_mode(prompt, app)?;
        }

        app.update(&mut self.input.keys)?;
        Ok(())
    }

    fn toggle_display_mode<P: Prompt, A: Application>(
        &mut self,
        prompt: &mut P,
        app: &mut A,
    ) -> Result<(), EngineError> {
        let target = self.session.mode().toggled();
        match self.session.switch(&mut self.backend, target, &mut *prompt) {
            Ok(report) => {
                Self::report_teardown(prompt, &report);
                app.initialize(&mut self.backend)?;
                Ok(())
            }
            Err(e) => {
                Self::report_teardown(prompt, &e.release);
                Self::report_session_error(prompt, &e.source);
                self.running = false;
                Err(EngineError::Switch(e))
            }
        }
    }

    fn handle_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::Resized { width, height } => {
                self.session.resize(&mut self.backend, width, height);
            }
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                self.running = false;
            }
            WindowEvent::Activated { minimized } => {
                log::debug!("Window {}", if minimized { "minimized" } else { "active" });
            }
            WindowEvent::KeyDown(_) | WindowEvent::KeyUp(_) => {}
        }
        self.input.apply(&event);
    }

    fn report_session_error<P: Prompt>(prompt: &mut P, error: &SessionError) {
        // The fallback dialog has already told the user
        if !matches!(error, SessionError::DisplayModeUnsupported(_)) {
            prompt.report_error(&error.to_string());
        }
    }

    fn report_teardown<P: Prompt>(prompt: &mut P, report: &ReleaseReport) {
        for failure in &report.failures {
            prompt.report_error(&failure.to_string());
        }
    }

    /// Request loop exit after the current iteration
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the loop keeps going
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Get the backend
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Get the display session
    pub const fn session(&self) -> &DisplaySession<B> {
        &self.session
    }

    /// Get the input state
    pub const fn input(&self) -> &InputState {
        &self.input
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// The first session could not be acquired
    #[error("Failed to start display session: {0}")]
    Acquire(SessionError),

    /// A display mode switch failed; the previous session is gone
    #[error(transparent)]
    Switch(SwitchError),

    /// Application callback failed
    #[error(transparent)]
    Application(#[from] AppError),
}
