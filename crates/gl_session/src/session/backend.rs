//! Backend-agnostic display trait
//!
//! This module defines the contract every platform backend implements. Each
//! method maps to one OS or driver call the session manager sequences during
//! acquisition and teardown; the ordering and rollback logic live in
//! [`DisplaySession`](super::DisplaySession), never in a backend.
//!
//! # Handle types
//! Handles are small `Copy` tokens. The session stores them in `Option`
//! fields and hands each one back exactly once on release.

use bitflags::bitflags;
use thiserror::Error;

use crate::input::WindowEvent;
use crate::render::Renderer;

/// Raw failure reported by a backend call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The window class is already registered
    #[error("window class already registered")]
    AlreadyRegistered,

    /// The requested display mode is not available
    #[error("display mode {0} is not supported")]
    UnsupportedMode(VideoMode),

    /// An OS call failed
    #[error("{operation} failed (os error {code})")]
    Os {
        /// Name of the failing call
        operation: &'static str,
        /// OS error code, 0 when the call sets none
        code: u32,
    },

    /// Injected or otherwise synthetic failure
    #[error("{0}")]
    Rejected(String),
}

/// Exclusive display mode requested for full-screen presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoMode {
    /// Horizontal resolution
    pub width: u32,
    /// Vertical resolution
    pub height: u32,
    /// Bits per pixel
    pub bits_per_pixel: u8,
}

impl std::fmt::Display for VideoMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.bits_per_pixel)
    }
}

/// Window decoration style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStyle {
    /// Borderless popup covering the display, used in full-screen mode
    Popup,
    /// Title bar, sizing frame and system menu, used in windowed mode
    Overlapped,
}

/// Border thickness the OS adds around a client area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameInsets {
    /// Left border
    pub left: i32,
    /// Top border, including any title bar
    pub top: i32,
    /// Right border
    pub right: i32,
    /// Bottom border
    pub bottom: i32,
}

/// Window rectangle in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRect {
    /// Left edge
    pub left: i32,
    /// Top edge
    pub top: i32,
    /// Right edge (exclusive)
    pub right: i32,
    /// Bottom edge (exclusive)
    pub bottom: i32,
}

impl WindowRect {
    /// Rectangle at the origin with the given client size
    pub fn from_client_size(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            right: i32::try_from(width).unwrap_or(i32::MAX),
            bottom: i32::try_from(height).unwrap_or(i32::MAX),
        }
    }

    /// Grow a client rectangle outwards by the frame insets
    #[must_use]
    pub const fn expanded(self, insets: FrameInsets) -> Self {
        Self {
            left: self.left.saturating_sub(insets.left),
            top: self.top.saturating_sub(insets.top),
            right: self.right.saturating_add(insets.right),
            bottom: self.bottom.saturating_add(insets.bottom),
        }
    }

    /// Outer width
    pub const fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    /// Outer height
    pub const fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }
}

bitflags! {
    /// Capabilities a pixel format must provide
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PixelFormatFlags: u32 {
        /// Format can draw to a window
        const DRAW_TO_WINDOW = 0x0000_0004;
        /// Format supports OpenGL rendering
        const SUPPORT_OPENGL = 0x0000_0020;
        /// Format is double-buffered
        const DOUBLE_BUFFER = 0x0000_0001;
    }
}

/// Pixel format requirements negotiated with the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormatRequest {
    /// Required capabilities
    pub flags: PixelFormatFlags,
    /// Color buffer bits (RGBA color model)
    pub color_bits: u8,
    /// Depth buffer bits
    pub depth_bits: u8,
    /// Stencil buffer bits
    pub stencil_bits: u8,
    /// Auxiliary buffer count
    pub aux_buffers: u8,
}

impl PixelFormatRequest {
    /// Window-drawable, OpenGL-capable, double-buffered RGBA with matching
    /// color and depth precision and no stencil or auxiliary buffers
    pub const fn for_color_depth(bits: u8) -> Self {
        Self {
            flags: PixelFormatFlags::DRAW_TO_WINDOW
                .union(PixelFormatFlags::SUPPORT_OPENGL)
                .union(PixelFormatFlags::DOUBLE_BUFFER),
            color_bits: bits,
            depth_bits: bits,
            stencil_bits: 0,
            aux_buffers: 0,
        }
    }
}

/// Parameters for native window creation
#[derive(Debug, Clone, Copy)]
pub struct WindowDesc<'a> {
    /// Registered class name
    pub class_name: &'a str,
    /// Title bar text
    pub title: &'a str,
    /// Decoration style
    pub style: WindowStyle,
    /// Outer rectangle, frame included
    pub rect: WindowRect,
}

/// Internal trait for display backend implementations
///
/// Every fallible call returns a raw [`BackendError`]; the session maps it to
/// the matching [`SessionError`](super::SessionError) kind. Backends must not
/// release anything on their own when a call fails.
///
/// # Thread Safety
/// No `Send` bound: the window, message queue and current context all belong
/// to the thread that created them.
pub trait DisplayBackend: Renderer {
    /// Native window handle
    type Window: Copy + std::fmt::Debug;
    /// Drawing surface handle (device context)
    type Surface: Copy + std::fmt::Debug;
    /// Graphics context handle
    type Context: Copy + std::fmt::Debug;
    /// Negotiated pixel format
    type PixelFormat: Copy + std::fmt::Debug;

    /// Register the window class
    fn register_class(&mut self, class_name: &str) -> Result<(), BackendError>;

    /// Unregister the window class
    fn unregister_class(&mut self, class_name: &str) -> Result<(), BackendError>;

    /// Switch the display to an exclusive full-screen mode
    fn change_display_mode(&mut self, mode: VideoMode) -> Result<(), BackendError>;

    /// Restore the desktop display mode
    fn restore_display_mode(&mut self) -> Result<(), BackendError>;

    /// Show or hide the cursor
    fn set_cursor_visible(&mut self, visible: bool);

    /// Frame insets the OS adds around a client area for `style`
    fn frame_insets(&self, style: WindowStyle) -> FrameInsets;

    /// Create the native window
    fn create_window(&mut self, desc: &WindowDesc<'_>) -> Result<Self::Window, BackendError>;

    /// Destroy the native window
    fn destroy_window(&mut self, window: Self::Window) -> Result<(), BackendError>;

    /// Acquire the drawing surface of a window
    fn acquire_surface(&mut self, window: Self::Window) -> Result<Self::Surface, BackendError>;

    /// Release a drawing surface
    fn release_surface(&mut self, window: Self::Window, surface: Self::Surface) -> Result<(), BackendError>;

    /// Find a pixel format matching `request`
    fn choose_pixel_format(
        &mut self,
        surface: Self::Surface,
        request: &PixelFormatRequest,
    ) -> Result<Self::PixelFormat, BackendError>;

    /// Apply a pixel format to a surface; a surface accepts this only once
    fn apply_pixel_format(
        &mut self,
        surface: Self::Surface,
        format: Self::PixelFormat,
        request: &PixelFormatRequest,
    ) -> Result<(), BackendError>;

    /// Create a graphics context against a surface
    fn create_context(&mut self, surface: Self::Surface) -> Result<Self::Context, BackendError>;

    /// Bind a context to the calling thread
    fn make_current(&mut self, surface: Self::Surface, context: Self::Context) -> Result<(), BackendError>;

    /// Unbind whatever context is current on the calling thread
    fn clear_current(&mut self) -> Result<(), BackendError>;

    /// Delete a graphics context
    fn delete_context(&mut self, context: Self::Context) -> Result<(), BackendError>;

    /// Show the window, bring it to the foreground and give it keyboard focus
    fn present_window(&mut self, window: Self::Window);

    /// Swap front and back buffers
    fn swap_buffers(&mut self, surface: Self::Surface) -> Result<(), BackendError>;

    /// Dispatch pending OS messages and return the next decoded event
    ///
    /// Returns `None` when the queue is empty.
    fn poll_event(&mut self) -> Option<WindowEvent>;

    /// Block until the OS has a message for this thread
    fn wait_event(&mut self) {}
}
