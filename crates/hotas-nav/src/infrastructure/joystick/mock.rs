//! Scripted joystick for tests.
//!
//! Each poll pops the next scripted result.  Once the script is exhausted the
//! last successful bitmask is returned forever, which models a user holding
//! (or not touching) the buttons.
//!
//! ```ignore
//! let joystick = MockJoystick::new();
//! joystick.push_bits(0b00);   // baseline
//! joystick.push_bits(0b10);   // button 2 pressed, then held
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use hotas_core::ButtonBitmask;

use crate::application::device_query::{DeviceQueryError, JoystickApi, JoystickDevice, PollError};

/// In-memory [`JoystickApi`] driven by a script of poll results.
#[derive(Default)]
pub struct MockJoystick {
    /// Returned by `list_devices`.
    pub devices: Mutex<Vec<JoystickDevice>>,
    /// When `true`, `list_devices` fails.
    pub fail_listing: bool,
    script: Mutex<VecDeque<Result<ButtonBitmask, PollError>>>,
    held: Mutex<ButtonBitmask>,
    polls: AtomicUsize,
}

impl MockJoystick {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_devices(devices: Vec<JoystickDevice>) -> Self {
        Self {
            devices: Mutex::new(devices),
            ..Self::default()
        }
    }

    /// A joystick whose `list_devices` always fails.
    pub fn failing_listing() -> Self {
        Self {
            fail_listing: true,
            ..Self::default()
        }
    }

    /// Queues one successful observation.
    pub fn push_bits(&self, bits: u32) {
        self.script.lock().unwrap().push_back(Ok(ButtonBitmask(bits)));
    }

    /// Queues one failed observation.
    pub fn push_error(&self, error: PollError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// Drops the script and returns `bits` on every following poll.
    pub fn hold_bits(&self, bits: u32) {
        self.script.lock().unwrap().clear();
        *self.held.lock().unwrap() = ButtonBitmask(bits);
    }

    /// Number of `poll_buttons` calls so far.
    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

impl JoystickApi for MockJoystick {
    fn list_devices(&self) -> Result<Vec<JoystickDevice>, DeviceQueryError> {
        if self.fail_listing {
            return Err(DeviceQueryError::Unavailable("mock failure".into()));
        }
        Ok(self.devices.lock().unwrap().clone())
    }

    fn poll_buttons(&self, _device_id: u32) -> Result<ButtonBitmask, PollError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(bits)) => {
                *self.held.lock().unwrap() = bits;
                Ok(bits)
            }
            Some(Err(e)) => Err(e),
            None => Ok(*self.held.lock().unwrap()),
        }
    }
}
