//! Session errors and teardown reporting

use thiserror::Error;

use super::backend::BackendError;

/// Acquisition failure
///
/// By the time one of these is returned every resource acquired before the
/// failing step has already been released.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Request rejected before touching the OS
    #[error("invalid session request: {0}")]
    InvalidRequest(String),

    /// Acquire called on a session that is not unacquired
    #[error("session is already acquired")]
    AlreadyAcquired,

    /// Window class registration failed
    #[error("failed to register window class: {0}")]
    ClassRegistrationFailed(BackendError),

    /// Full-screen mode unavailable and the fallback was declined
    #[error("full-screen mode is not supported: {0}")]
    DisplayModeUnsupported(BackendError),

    /// Native window creation failed
    #[error("failed to create window: {0}")]
    WindowCreationFailed(BackendError),

    /// No drawing surface could be obtained for the window
    #[error("failed to create OpenGL device context: {0}")]
    SurfaceAcquisitionFailed(BackendError),

    /// No pixel format matches the request
    #[error("failed to find suitable pixel format: {0}")]
    NoSuitablePixelFormat(BackendError),

    /// The chosen pixel format could not be applied
    #[error("failed to set pixel format: {0}")]
    FormatApplicationFailed(BackendError),

    /// Graphics context creation failed
    #[error("failed to create OpenGL rendering context: {0}")]
    ContextCreationFailed(BackendError),

    /// Graphics context could not be bound
    #[error("failed to activate OpenGL rendering context: {0}")]
    ContextBindFailed(BackendError),
}

/// One step of the release sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownStep {
    /// Restore the desktop display mode
    RestoreDisplayMode,
    /// Unbind the graphics context
    UnbindContext,
    /// Delete the graphics context
    DeleteContext,
    /// Release the drawing surface
    ReleaseSurface,
    /// Destroy the native window
    DestroyWindow,
    /// Unregister the window class
    UnregisterClass,
}

impl std::fmt::Display for TeardownStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::RestoreDisplayMode => "restore display mode",
            Self::UnbindContext => "release device and rendering context",
            Self::DeleteContext => "delete rendering context",
            Self::ReleaseSurface => "release device context",
            Self::DestroyWindow => "destroy window handle",
            Self::UnregisterClass => "unregister window class",
        };
        f.write_str(text)
    }
}

/// Failure of a single release step
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to {step}: {source}")]
pub struct TeardownError {
    /// Step that failed
    pub step: TeardownStep,
    /// Backend failure
    pub source: BackendError,
}

/// Outcome of a release
///
/// Teardown never stops early; every failed step is collected here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseReport {
    /// Steps that failed, in the order they ran
    pub failures: Vec<TeardownError>,
}

impl ReleaseReport {
    /// Whether every step succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn record(&mut self, step: TeardownStep, result: Result<(), BackendError>) {
        if let Err(source) = result {
            let failure = TeardownError { step, source };
            log::error!("Teardown: {}", failure);
            self.failures.push(failure);
        }
    }
}
