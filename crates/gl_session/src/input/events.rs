//! Window events and the input state they drive

use super::{Key, KeyboardState};

/// Window system notification, already decoded by the platform backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// Window activation changed; `minimized` is true while iconified
    Activated {
        /// Whether the window is minimized
        minimized: bool,
    },
    /// Key went down
    KeyDown(Key),
    /// Key went up
    KeyUp(Key),
    /// Client area resized
    Resized {
        /// New client width
        width: u32,
        /// New client height
        height: u32,
    },
    /// The OS asked the application to close
    CloseRequested,
}

/// Application input state: key table plus the active flag
#[derive(Debug, Clone)]
pub struct InputState {
    /// Virtual key table
    pub keys: KeyboardState,
    active: bool,
}

impl InputState {
    /// Fresh state: no keys held, window considered active
    pub const fn new() -> Self {
        Self {
            keys: KeyboardState::new(),
            active: true,
        }
    }

    /// Fold one event into the state
    ///
    /// Resize and close notifications carry no input state and are ignored
    /// here; the run loop handles them.
    pub fn apply(&mut self, event: &WindowEvent) {
        match *event {
            WindowEvent::Activated { minimized } => self.active = !minimized,
            WindowEvent::KeyDown(key) => self.keys.set(key, true),
            WindowEvent::KeyUp(key) => self.keys.set(key, false),
            WindowEvent::Resized { .. } | WindowEvent::CloseRequested => {}
        }
    }

    /// Whether the window is active (not minimized)
    pub const fn is_active(&self) -> bool {
        self.active
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
