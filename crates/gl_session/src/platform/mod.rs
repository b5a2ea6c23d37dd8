//! Platform backends
//!
//! - **headless**: in-memory fake with fault injection, used by tests and
//!   unattended runs
//! - **win32**: native windows, GDI device contexts and WGL contexts

pub mod headless;

#[cfg(windows)]
pub mod win32;

pub use headless::HeadlessBackend;

#[cfg(windows)]
pub use win32::{MessageBoxPrompt, Win32Backend};
