//! Windows key injection via `SendInput`.

use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_EXTENDEDKEY, KEYEVENTF_KEYUP, VIRTUAL_KEY,
};

use crate::application::navigate::{InjectionError, KeyInjector};

/// Navigation cluster keys (PgUp..Down, Insert, Delete) live on the extended
/// keypad and need `KEYEVENTF_EXTENDEDKEY`.
const EXTENDED_VKS: &[u16] = &[0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27, 0x28, 0x2D, 0x2E];

/// [`KeyInjector`] that posts virtual-key events to the active input queue.
#[derive(Debug, Default)]
pub struct SendInputInjector;

impl SendInputInjector {
    pub fn new() -> Self {
        Self
    }
}

impl KeyInjector for SendInputInjector {
    fn send_key(&self, vk: u16, key_up: bool) -> Result<(), InjectionError> {
        let mut flags = KEYBD_EVENT_FLAGS(0);
        if key_up {
            flags |= KEYEVENTF_KEYUP;
        }
        if EXTENDED_VKS.contains(&vk) {
            flags |= KEYEVENTF_EXTENDEDKEY;
        }

        let input = INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: VIRTUAL_KEY(vk),
                    wScan: 0,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        };
        // SAFETY: input is a valid KEYBDINPUT structure
        let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
        if sent == 0 {
            return Err(InjectionError::Blocked(
                windows::core::Error::from_win32().message(),
            ));
        }
        Ok(())
    }
}
