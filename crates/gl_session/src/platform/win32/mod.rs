//! Win32 + WGL backend
//!
//! Handles are the raw Win32 values (`HWND`, `HDC`, `HGLRC`, pixel format
//! index). The window procedure decodes the messages the run loop cares about
//! into [`WindowEvent`](crate::input::WindowEvent)s and queues them per thread;
//! [`Win32Backend::poll_event`](crate::session::DisplayBackend::poll_event)
//! pumps the OS queue and hands them out one at a time.

mod backend;
mod dialogs;
mod gl;
mod wndproc;

pub use backend::Win32Backend;
pub use dialogs::MessageBoxPrompt;

/// NUL-terminated UTF-16 copy of `text`
pub(crate) fn wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}
