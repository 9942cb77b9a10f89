//! Windows foreground-window query and window lookup.

use windows::core::{HSTRING, PCWSTR};
use windows::Win32::UI::WindowsAndMessaging::{FindWindowW, GetForegroundWindow};

use crate::application::navigate::{ForegroundWindow, WindowHandle};

/// [`ForegroundWindow`] backed by `GetForegroundWindow`.
#[derive(Debug, Default)]
pub struct Win32ForegroundWindow;

impl Win32ForegroundWindow {
    pub fn new() -> Self {
        Self
    }
}

impl ForegroundWindow for Win32ForegroundWindow {
    fn foreground_window(&self) -> Option<WindowHandle> {
        // SAFETY: GetForegroundWindow has no preconditions.
        let hwnd = unsafe { GetForegroundWindow() };
        if hwnd.is_invalid() {
            None
        } else {
            Some(WindowHandle(hwnd.0 as isize))
        }
    }
}

/// Finds a top-level window by its exact title.
pub fn find_window_by_title(title: &str) -> Option<WindowHandle> {
    let title = HSTRING::from(title);
    // SAFETY: both string arguments outlive the call.
    let hwnd = unsafe { FindWindowW(PCWSTR::null(), &title) }.ok()?;
    if hwnd.is_invalid() {
        None
    } else {
        Some(WindowHandle(hwnd.0 as isize))
    }
}
