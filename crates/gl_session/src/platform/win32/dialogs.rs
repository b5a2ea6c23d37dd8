//! Modal message boxes for launch mode, fallback and error reporting

use windows_sys::Win32::UI::WindowsAndMessaging::{
    MessageBoxW, IDYES, MB_ICONEXCLAMATION, MB_ICONINFORMATION, MB_ICONQUESTION, MB_ICONSTOP, MB_OK, MB_YESNO,
    MESSAGEBOX_STYLE,
};

use super::wide;
use crate::session::{DisplayMode, FallbackDecision, FallbackPolicy, Prompt, VideoMode};

fn message_box(text: &str, caption: &str, style: MESSAGEBOX_STYLE) -> i32 {
    let text = wide(text);
    let caption = wide(caption);
    unsafe { MessageBoxW(0, text.as_ptr(), caption.as_ptr(), style) }
}

/// [`Prompt`] backed by native message boxes
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageBoxPrompt;

impl FallbackPolicy for MessageBoxPrompt {
    fn on_fullscreen_unsupported(&mut self, mode: VideoMode) -> FallbackDecision {
        log::warn!("Display mode {} rejected by the driver", mode);
        let answer = message_box(
            "Full screen mode is not supported. Do you want to continue in window mode?",
            "Full Screen Error",
            MB_YESNO | MB_ICONEXCLAMATION,
        );
        if answer == IDYES {
            FallbackDecision::ContinueWindowed
        } else {
            message_box("Program will now close.", "Error", MB_OK | MB_ICONSTOP);
            FallbackDecision::Abort
        }
    }
}

impl Prompt for MessageBoxPrompt {
    fn choose_launch_mode(&mut self) -> DisplayMode {
        let answer = message_box("Enable full screen mode?", "Launch Mode", MB_YESNO | MB_ICONQUESTION);
        if answer == IDYES {
            DisplayMode::FullScreen
        } else {
            DisplayMode::Windowed
        }
    }

    fn report_error(&mut self, message: &str) {
        message_box(message, "Error", MB_OK | MB_ICONINFORMATION);
    }
}
