//! Window procedure and the per-thread event queue it feeds

use std::cell::RefCell;
use std::collections::VecDeque;

use windows_sys::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    DefWindowProcW, PostQuitMessage, SC_MONITORPOWER, SC_SCREENSAVE, WM_ACTIVATE, WM_CLOSE, WM_KEYDOWN, WM_KEYUP,
    WM_SIZE, WM_SYSCOMMAND,
};

use crate::input::{Key, WindowEvent};

thread_local! {
    static EVENTS: RefCell<VecDeque<WindowEvent>> = RefCell::new(VecDeque::new());
}

fn push(event: WindowEvent) {
    EVENTS.with(|events| events.borrow_mut().push_back(event));
}

/// Next decoded event, if the window procedure queued one
pub(super) fn pop() -> Option<WindowEvent> {
    EVENTS.with(|events| events.borrow_mut().pop_front())
}

/// Drop events left over from a destroyed window
pub(super) fn discard_pending() {
    EVENTS.with(|events| events.borrow_mut().clear());
}

const fn low_word(value: usize) -> u32 {
    (value & 0xFFFF) as u32
}

const fn high_word(value: usize) -> u32 {
    ((value >> 16) & 0xFFFF) as u32
}

pub(super) unsafe extern "system" fn window_proc(
    hwnd: HWND,
    message: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match message {
        WM_ACTIVATE => {
            push(WindowEvent::Activated {
                minimized: high_word(wparam) != 0,
            });
            return 0;
        }
        WM_SYSCOMMAND => {
            // Keep the screensaver and monitor power-down from kicking in
            let command = (wparam & 0xFFF0) as u32;
            if command == SC_SCREENSAVE || command == SC_MONITORPOWER {
                return 0;
            }
        }
        WM_CLOSE => {
            PostQuitMessage(0);
            return 0;
        }
        WM_KEYDOWN => {
            if let Some(key) = Key::from_raw(wparam) {
                push(WindowEvent::KeyDown(key));
            }
            return 0;
        }
        WM_KEYUP => {
            if let Some(key) = Key::from_raw(wparam) {
                push(WindowEvent::KeyUp(key));
            }
            return 0;
        }
        WM_SIZE => {
            let size = lparam as usize;
            push(WindowEvent::Resized {
                width: low_word(size),
                height: high_word(size),
            });
            return 0;
        }
        _ => {}
    }

    DefWindowProcW(hwnd, message, wparam, lparam)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_split_packed_size() {
        let packed = (768usize << 16) | 1366;
        assert_eq!(low_word(packed), 1366);
        assert_eq!(high_word(packed), 768);
    }

    #[test]
    fn test_queue_is_fifo() {
        discard_pending();
        push(WindowEvent::KeyDown(Key::F11));
        push(WindowEvent::CloseRequested);

        assert_eq!(pop(), Some(WindowEvent::KeyDown(Key::F11)));
        assert_eq!(pop(), Some(WindowEvent::CloseRequested));
        assert_eq!(pop(), None);
    }
}
