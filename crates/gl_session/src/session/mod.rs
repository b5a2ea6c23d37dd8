//! # Display Session Manager
//!
//! Owns the lifecycle of a native window, its drawing surface and an OpenGL
//! context, and switches between windowed and full-screen presentation.
//!
//! ## Lifecycle
//!
//! ```text
//!   Unacquired ──acquire──▶ Acquiring ──all steps ok──▶ Live
//!        ▲                      │                        │
//!        │◀────rollback─────────┘                 release/switch
//!        │                                               ▼
//!        └──────────────────────────────────────── Releasing
//! ```
//!
//! Acquisition is all-or-nothing: a failing step releases everything acquired
//! before it. Release runs every step even when one fails and always ends in
//! [`SessionState::Unacquired`]. Handles are nested (context ⊆ surface ⊆
//! window) and are released in reverse acquisition order.
//!
//! All OS interaction goes through a [`DisplayBackend`], so the state machine
//! runs unchanged against [`HeadlessBackend`](crate::platform::headless::HeadlessBackend).

pub mod backend;
pub mod error;
pub mod fallback;

#[cfg(test)]
mod tests;

pub use backend::{
    BackendError, DisplayBackend, FrameInsets, PixelFormatFlags, PixelFormatRequest, VideoMode,
    WindowDesc, WindowRect, WindowStyle,
};
pub use error::{ReleaseReport, SessionError, TeardownError, TeardownStep};
pub use fallback::{FallbackDecision, FallbackPolicy, Prompt, ScriptedPrompt};

use thiserror::Error;

use crate::config::{Extent, SessionConfig};
use crate::render::{Projection, RenderState};

/// Presentation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Decorated window on the desktop
    Windowed,
    /// Borderless window over an exclusive display mode
    FullScreen,
}

impl DisplayMode {
    /// The other mode
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Windowed => Self::FullScreen,
            Self::FullScreen => Self::Windowed,
        }
    }

    /// Window style used for this mode
    pub const fn window_style(self) -> WindowStyle {
        match self {
            Self::Windowed => WindowStyle::Overlapped,
            Self::FullScreen => WindowStyle::Popup,
        }
    }
}

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No resource held
    Unacquired,
    /// Acquisition in progress
    Acquiring,
    /// Window, surface and bound context all present
    Live,
    /// Teardown in progress
    Releasing,
}

/// A failed [`DisplaySession::switch`]
///
/// The previous session is gone at this point; callers are expected to exit.
#[derive(Error, Debug, Clone)]
#[error("display mode switch failed: {source}")]
pub struct SwitchError {
    /// Report from releasing the previous session
    pub release: ReleaseReport,
    /// Why the new session could not be acquired
    #[source]
    pub source: SessionError,
}

/// One on-screen presentation: window + drawing surface + graphics context
pub struct DisplaySession<B: DisplayBackend> {
    config: SessionConfig,
    state: SessionState,
    mode: DisplayMode,
    extent: Extent,
    class_registered: bool,
    display_overridden: bool,
    cursor_hidden: bool,
    window: Option<B::Window>,
    surface: Option<B::Surface>,
    context: Option<B::Context>,
    context_bound: bool,
    projection: Option<Projection>,
}

impl<B: DisplayBackend> DisplaySession<B> {
    /// Create an unacquired session for `config`
    pub fn new(config: SessionConfig) -> Self {
        let extent = config.windowed;
        Self {
            config,
            state: SessionState::Unacquired,
            mode: DisplayMode::Windowed,
            extent,
            class_registered: false,
            display_overridden: false,
            cursor_hidden: false,
            window: None,
            surface: None,
            context: None,
            context_bound: false,
            projection: None,
        }
    }

    /// Bring up window, surface and context in `mode`
    ///
    /// On failure everything acquired so far has been released and the
    /// session is back in [`SessionState::Unacquired`].
    pub fn acquire(
        &mut self,
        backend: &mut B,
        mode: DisplayMode,
        policy: &mut dyn FallbackPolicy,
    ) -> Result<(), SessionError> {
        if self.state != SessionState::Unacquired {
            return Err(SessionError::AlreadyAcquired);
        }
        self.config
            .validate()
            .map_err(|e| SessionError::InvalidRequest(e.to_string()))?;

        self.state = SessionState::Acquiring;
        self.mode = mode;
        self.extent = self.config.extent_for(mode);
        log::info!(
            "Acquiring {:?} session \"{}\" at {}x{}x{}",
            mode,
            self.config.title,
            self.extent.width,
            self.extent.height,
            self.config.color_depth
        );

        match self.acquire_steps(backend, policy) {
            Ok(()) => {
                self.state = SessionState::Live;
                log::info!("Session live in {:?} mode", self.mode);
                Ok(())
            }
            Err(e) => {
                log::error!("Session acquisition failed: {}", e);
                let report = self.teardown(backend);
                if !report.is_clean() {
                    log::warn!("Rollback finished with {} failed step(s)", report.failures.len());
                }
                self.state = SessionState::Unacquired;
                Err(e)
            }
        }
    }

    fn acquire_steps(&mut self, backend: &mut B, policy: &mut dyn FallbackPolicy) -> Result<(), SessionError> {
        let color_depth = self.config.color_depth;

        log::debug!("Registering window class {}", self.config.class_name);
        match backend.register_class(&self.config.class_name) {
            Ok(()) => self.class_registered = true,
            Err(BackendError::AlreadyRegistered) => {
                log::warn!("Window class {} already registered, reusing it", self.config.class_name);
                self.class_registered = true;
            }
            Err(e) => return Err(SessionError::ClassRegistrationFailed(e)),
        }

        if self.mode == DisplayMode::FullScreen {
            let video_mode = VideoMode {
                width: self.extent.width,
                height: self.extent.height,
                bits_per_pixel: color_depth,
            };
            log::debug!("Changing display mode to {}", video_mode);
            match backend.change_display_mode(video_mode) {
                Ok(()) => self.display_overridden = true,
                Err(e) => match policy.on_fullscreen_unsupported(video_mode) {
                    FallbackDecision::ContinueWindowed => {
                        log::warn!("Full-screen {} unavailable ({}), continuing windowed", video_mode, e);
                        self.mode = DisplayMode::Windowed;
                    }
                    FallbackDecision::Abort => return Err(SessionError::DisplayModeUnsupported(e)),
                },
            }
        }

        let style = self.mode.window_style();
        let rect = WindowRect::from_client_size(self.extent.width, self.extent.height)
            .expanded(backend.frame_insets(style));

        if self.mode == DisplayMode::FullScreen {
            backend.set_cursor_visible(false);
            self.cursor_hidden = true;
        }

        log::debug!("Creating {:?} window {}x{}", style, rect.width(), rect.height());
        let window = backend
            .create_window(&WindowDesc {
                class_name: &self.config.class_name,
                title: &self.config.title,
                style,
                rect,
            })
            .map_err(SessionError::WindowCreationFailed)?;
        self.window = Some(window);

        log::debug!("Acquiring drawing surface");
        let surface = backend
            .acquire_surface(window)
            .map_err(SessionError::SurfaceAcquisitionFailed)?;
        self.surface = Some(surface);

        let request = PixelFormatRequest::for_color_depth(color_depth);
        log::debug!("Choosing pixel format {:?}", request);
        let format = backend
            .choose_pixel_format(surface, &request)
            .map_err(SessionError::NoSuitablePixelFormat)?;
        backend
            .apply_pixel_format(surface, format, &request)
            .map_err(SessionError::FormatApplicationFailed)?;

        log::debug!("Creating rendering context");
        let context = backend
            .create_context(surface)
            .map_err(SessionError::ContextCreationFailed)?;
        self.context = Some(context);

        backend
            .make_current(surface, context)
            .map_err(SessionError::ContextBindFailed)?;
        self.context_bound = true;

        backend.present_window(window);
        let projection = Projection::for_client(self.extent.width, self.extent.height);
        backend.apply_projection(&projection);
        self.projection = Some(projection);
        backend.apply_render_state(&RenderState::BASELINE);

        Ok(())
    }

    /// Tear the session down
    ///
    /// Idempotent: releasing an unacquired session does nothing and returns a
    /// clean report.
    pub fn release(&mut self, backend: &mut B) -> ReleaseReport {
        if self.state == SessionState::Unacquired && !self.holds_resources() {
            log::trace!("Release on unacquired session ignored");
            return ReleaseReport::default();
        }

        log::info!("Releasing {:?} session", self.mode);
        self.state = SessionState::Releasing;
        let report = self.teardown(backend);
        self.state = SessionState::Unacquired;
        report
    }

    /// Release then re-acquire in `mode`
    ///
    /// There is no partial switch: if acquisition fails the previous session
    /// is already gone.
    pub fn switch(
        &mut self,
        backend: &mut B,
        mode: DisplayMode,
        policy: &mut dyn FallbackPolicy,
    ) -> Result<ReleaseReport, SwitchError> {
        log::info!("Switching display mode {:?} -> {:?}", self.mode, mode);
        let release = self.release(backend);
        match self.acquire(backend, mode, policy) {
            Ok(()) => Ok(release),
            Err(source) => Err(SwitchError { release, source }),
        }
    }

    /// Recompute viewport and perspective for a new client size
    ///
    /// Touches no handle. Ignored unless the session is live.
    pub fn resize(&mut self, backend: &mut B, width: u32, height: u32) -> Option<&Projection> {
        if self.state != SessionState::Live {
            log::trace!("Resize to {}x{} ignored in {:?}", width, height, self.state);
            return None;
        }

        let projection = Projection::for_client(width, height);
        backend.apply_projection(&projection);
        self.projection = Some(projection);
        self.projection.as_ref()
    }

    /// Swap buffers of the live surface
    pub fn present(&self, backend: &mut B) -> Result<(), BackendError> {
        match self.surface {
            Some(surface) if self.state == SessionState::Live => backend.swap_buffers(surface),
            _ => Ok(()),
        }
    }

    /// Reverse-order teardown shared by release and rollback
    fn teardown(&mut self, backend: &mut B) -> ReleaseReport {
        let mut report = ReleaseReport::default();

        if self.display_overridden {
            report.record(TeardownStep::RestoreDisplayMode, backend.restore_display_mode());
            self.display_overridden = false;
        }
        if self.cursor_hidden {
            backend.set_cursor_visible(true);
            self.cursor_hidden = false;
        }

        if let Some(context) = self.context.take() {
            if self.context_bound {
                report.record(TeardownStep::UnbindContext, backend.clear_current());
                self.context_bound = false;
            }
            report.record(TeardownStep::DeleteContext, backend.delete_context(context));
        }

        if let Some(surface) = self.surface.take() {
            debug_assert!(self.window.is_some(), "surface outlived its window");
            if let Some(window) = self.window {
                report.record(TeardownStep::ReleaseSurface, backend.release_surface(window, surface));
            }
        }

        if let Some(window) = self.window.take() {
            report.record(TeardownStep::DestroyWindow, backend.destroy_window(window));
        }

        if self.class_registered {
            report.record(
                TeardownStep::UnregisterClass,
                backend.unregister_class(&self.config.class_name),
            );
            self.class_registered = false;
        }

        self.projection = None;
        report
    }

    /// Whether any OS resource or override is still held
    pub fn holds_resources(&self) -> bool {
        self.class_registered
            || self.display_overridden
            || self.cursor_hidden
            || self.window.is_some()
            || self.surface.is_some()
            || self.context.is_some()
    }

    /// Current lifecycle state
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the session is live
    pub fn is_live(&self) -> bool {
        self.state == SessionState::Live
    }

    /// Effective display mode (after any full-screen fallback)
    pub const fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Client size the session was acquired with
    pub const fn extent(&self) -> Extent {
        self.extent
    }

    /// Configuration the session acquires with
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Native window, if present
    pub fn window(&self) -> Option<B::Window> {
        self.window
    }

    /// Drawing surface, if present
    pub fn surface(&self) -> Option<B::Surface> {
        self.surface
    }

    /// Graphics context, if present
    pub fn context(&self) -> Option<B::Context> {
        self.context
    }

    /// Whether the context is bound to the calling thread
    pub const fn is_context_bound(&self) -> bool {
        self.context_bound
    }

    /// Whether the cursor was hidden by this session
    pub const fn is_cursor_hidden(&self) -> bool {
        self.cursor_hidden
    }

    /// Whether the OS display mode is overridden
    pub const fn has_display_override(&self) -> bool {
        self.display_overridden
    }

    /// Most recent projection
    pub const fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }
}

impl<B: DisplayBackend> std::fmt::Debug for DisplaySession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplaySession")
            .field("state", &self.state)
            .field("mode", &self.mode)
            .field("extent", &self.extent)
            .field("class_registered", &self.class_registered)
            .field("display_overridden", &self.display_overridden)
            .field("window", &self.window)
            .field("surface", &self.surface)
            .field("context", &self.context)
            .field("context_bound", &self.context_bound)
            .finish_non_exhaustive()
    }
}

impl<B: DisplayBackend> Drop for DisplaySession<B> {
    fn drop(&mut self) {
        if self.holds_resources() {
            log::warn!("DisplaySession dropped while still holding resources; call release() first");
        }
    }
}
