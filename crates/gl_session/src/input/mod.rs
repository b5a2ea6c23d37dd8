//! Input management system
//!
//! Window messages arrive as [`WindowEvent`] values produced by the platform
//! backend. [`InputState::apply`] folds them into a 256-entry key table and an
//! active flag that the run loop consults once per idle iteration.

mod events;

pub use events::{InputState, WindowEvent};

/// Number of virtual key codes tracked by [`KeyboardState`]
pub const KEY_COUNT: usize = 256;

/// Virtual key code
///
/// Always in `0..256`, so it indexes the key table without a bounds failure.
/// Raw codes from the OS go through [`Key::from_raw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(u8);

impl Key {
    /// Escape key
    pub const ESCAPE: Self = Self(0x1B);
    /// Up arrow
    pub const UP: Self = Self(0x26);
    /// Down arrow
    pub const DOWN: Self = Self(0x28);
    /// F11 key
    pub const F11: Self = Self(0x7A);

    /// Validate a raw virtual key code
    pub fn from_raw(code: usize) -> Option<Self> {
        u8::try_from(code).ok().map(Self)
    }

    /// Key for an ASCII letter or digit
    ///
    /// Letter keys use their upper-case code regardless of the case passed in.
    pub fn from_char(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        if upper.is_ascii_uppercase() || upper.is_ascii_digit() {
            Some(Self(upper as u8))
        } else {
            None
        }
    }

    /// Raw virtual key code
    pub const fn code(self) -> u8 {
        self.0
    }

    const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Pressed/released state of every virtual key
#[derive(Clone)]
pub struct KeyboardState {
    keys: [bool; KEY_COUNT],
}

impl KeyboardState {
    /// Create a table with every key released
    pub const fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }

    /// Record a key transition
    pub fn set(&mut self, key: Key, pressed: bool) {
        self.keys[key.index()] = pressed;
    }

    /// Whether the key is currently held
    pub const fn is_down(&self, key: Key) -> bool {
        self.keys[key.index()]
    }

    /// Consume a key press
    ///
    /// Returns whether the key was down and marks it released, so one key-down
    /// message triggers one action even while the key stays held.
    pub fn take(&mut self, key: Key) -> bool {
        std::mem::replace(&mut self.keys[key.index()], false)
    }
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeyboardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pressed: Vec<u8> = (0..=u8::MAX).filter(|&code| self.keys[code as usize]).collect();
        f.debug_struct("KeyboardState").field("pressed", &pressed).finish()
    }
}
