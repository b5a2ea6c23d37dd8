//! Empty window with a keyboard-adjustable clear color
//!
//! Hold R, G, B or A and tap Up/Down to move that channel by
//! [`CHANNEL_STEP`]. Channels saturate at 0 and 1.

use gl_session::input::{Key, KeyboardState};
use gl_session::render::{Renderer, Rgba};
use gl_session::{AppError, Application};

/// Amount one key press moves a channel
pub const CHANNEL_STEP: f32 = 0.05;

/// Color channel selected by a held letter key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Red, selected with R
    Red,
    /// Green, selected with G
    Green,
    /// Blue, selected with B
    Blue,
    /// Alpha, selected with A
    Alpha,
}

impl Channel {
    /// Checked in this order; the first held channel consumes the arrow press
    pub const ALL: [Self; 4] = [Self::Red, Self::Green, Self::Blue, Self::Alpha];

    /// Key that selects this channel
    pub fn key(self) -> Option<Key> {
        Key::from_char(match self {
            Self::Red => 'R',
            Self::Green => 'G',
            Self::Blue => 'B',
            Self::Alpha => 'A',
        })
    }

    fn value_mut(self, color: &mut Rgba) -> &mut f32 {
        match self {
            Self::Red => &mut color.r,
            Self::Green => &mut color.g,
            Self::Blue => &mut color.b,
            Self::Alpha => &mut color.a,
        }
    }
}

/// Blank scene whose background color follows the keyboard
#[derive(Debug, Clone)]
pub struct ClearColorScene {
    color: Rgba,
    dirty: bool,
}

impl ClearColorScene {
    /// Scene starting from transparent black
    pub const fn new() -> Self {
        Self {
            color: Rgba::BLACK,
            dirty: false,
        }
    }

    /// Current clear color
    pub const fn color(&self) -> Rgba {
        self.color
    }

    /// Move `channel` by `delta`, saturating in [0, 1]
    pub fn adjust(&mut self, channel: Channel, delta: f32) {
        let value = channel.value_mut(&mut self.color);
        *value = (*value + delta).clamp(0.0, 1.0);
        self.dirty = true;
        log::debug!("{:?} channel now {:.2}", channel, *value);
    }
}

impl Default for ClearColorScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Application for ClearColorScene {
    fn initialize(&mut self, renderer: &mut dyn Renderer) -> Result<(), AppError> {
        // A new context starts from black; carry the chosen color over
        renderer.set_clear_color(self.color);
        self.dirty = false;
        Ok(())
    }

    fn render(&mut self, renderer: &mut dyn Renderer) -> Result<(), AppError> {
        if self.dirty {
            renderer.set_clear_color(self.color);
            self.dirty = false;
        }
        renderer.clear();
        renderer.load_identity();
        Ok(())
    }

    fn update(&mut self, keys: &mut KeyboardState) -> Result<(), AppError> {
        for channel in Channel::ALL {
            let Some(selector) = channel.key() else {
                continue;
            };
            if !keys.is_down(selector) {
                continue;
            }
            if keys.take(Key::UP) {
                self.adjust(channel, CHANNEL_STEP);
            } else if keys.take(Key::DOWN) {
                self.adjust(channel, -CHANNEL_STEP);
            }
        }
        Ok(())
    }
}
