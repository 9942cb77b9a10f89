//! Settable foreground window for tests.

use std::sync::Mutex;

use crate::application::navigate::{ForegroundWindow, WindowHandle};

/// A [`ForegroundWindow`] whose answer is set by the test.
#[derive(Default)]
pub struct MockForegroundWindow {
    current: Mutex<Option<WindowHandle>>,
}

impl MockForegroundWindow {
    pub fn focused_on(handle: WindowHandle) -> Self {
        Self {
            current: Mutex::new(Some(handle)),
        }
    }

    /// Changes the reported foreground window (`None`: no window active).
    pub fn set(&self, handle: Option<WindowHandle>) {
        *self.current.lock().unwrap() = handle;
    }
}

impl ForegroundWindow for MockForegroundWindow {
    fn foreground_window(&self) -> Option<WindowHandle> {
        *self.current.lock().unwrap()
    }
}
