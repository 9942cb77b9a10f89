//! Windows joystick access through winmm (`joyGetNumDevs`, `joyGetDevCapsW`,
//! `joyGetPosEx`).
//!
//! The multimedia joystick API reports a fixed number of slots (usually 16)
//! regardless of what is plugged in.  Empty or reserved slots fail the
//! capability query and are skipped when listing.

use std::mem::size_of;

use hotas_core::ButtonBitmask;
use tracing::{debug, trace};
use windows::Win32::Media::Multimedia::{
    joyGetDevCapsW, joyGetNumDevs, joyGetPosEx, JOYCAPSW, JOYINFOEX,
};

use crate::application::device_query::{
    enumerate_devices, DeviceQueryError, JoystickApi, JoystickDevice, PollError,
};

const JOYERR_NOERROR: u32 = 0;
const JOYERR_UNPLUGGED: u32 = 167;
/// `JOY_RETURNALL`: fill every field of `JOYINFOEX`.
const JOY_RETURNALL: u32 = 0xFF;

/// [`JoystickApi`] backed by winmm.
#[derive(Debug, Default)]
pub struct WinmmJoystick;

impl WinmmJoystick {
    pub fn new() -> Self {
        Self
    }
}

impl JoystickApi for WinmmJoystick {
    fn list_devices(&self) -> Result<Vec<JoystickDevice>, DeviceQueryError> {
        // SAFETY: joyGetNumDevs takes no arguments and has no preconditions.
        let slots = unsafe { joyGetNumDevs() };
        let devices = enumerate_devices(slots, |id| {
            let mut caps = JOYCAPSW::default();
            // SAFETY: caps is a valid, writable JOYCAPSW and the size matches.
            let status =
                unsafe { joyGetDevCapsW(id as usize, &mut caps, size_of::<JOYCAPSW>() as u32) };
            if status != JOYERR_NOERROR {
                trace!(id, status, "joyGetDevCapsW failed");
                return None;
            }
            Some((product_name(&caps.szPname), caps.wNumButtons))
        });

        debug!(slots, found = devices.len(), "enumerated joysticks");
        Ok(devices)
    }

    fn poll_buttons(&self, device_id: u32) -> Result<ButtonBitmask, PollError> {
        let mut info = JOYINFOEX {
            dwSize: size_of::<JOYINFOEX>() as u32,
            dwFlags: JOY_RETURNALL,
            ..Default::default()
        };
        // SAFETY: info is a valid JOYINFOEX with dwSize set as the API requires.
        let status = unsafe { joyGetPosEx(device_id, &mut info) };
        match status {
            JOYERR_NOERROR => Ok(ButtonBitmask(info.dwButtons)),
            JOYERR_UNPLUGGED => Err(PollError::Unplugged(device_id)),
            code => Err(PollError::Os { device_id, code }),
        }
    }
}

/// Decodes a NUL-terminated UTF-16 product name.
fn product_name(raw: &[u16]) -> String {
    let len = raw.iter().position(|c| *c == 0).unwrap_or(raw.len());
    String::from_utf16_lossy(&raw[..len]).trim().to_string()
}
