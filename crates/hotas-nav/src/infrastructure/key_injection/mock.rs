//! Recording key injector for tests.
//!
//! Every `send_key` call is pushed into a `Mutex<Vec<...>>` so assertions can
//! inspect exactly which keys were sent and in what order.
//!
//! # `should_fail` flag
//!
//! A failing injector still records the call, then returns an error.  This
//! exercises the "log and carry on" path of the navigation runtime.

use std::sync::Mutex;

use hotas_core::keymap::windows_vk::vk_to_direction;
use hotas_core::KeyTransition;

use crate::application::navigate::{InjectionError, KeyInjector};

/// A [`KeyInjector`] that records calls without touching the OS.
#[derive(Default)]
pub struct RecordingKeyInjector {
    /// `(vk, key_up)` for each call, in call order.
    pub events: Mutex<Vec<(u16, bool)>>,
    /// When `true`, every call returns [`InjectionError::Blocked`].
    pub should_fail: bool,
}

impl RecordingKeyInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Recorded events as direction transitions.  Non-arrow keys are omitted.
    pub fn transitions(&self) -> Vec<KeyTransition> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(vk, key_up)| {
                vk_to_direction(*vk).map(|direction| KeyTransition {
                    direction,
                    pressed: !key_up,
                })
            })
            .collect()
    }
}

impl KeyInjector for RecordingKeyInjector {
    fn send_key(&self, vk: u16, key_up: bool) -> Result<(), InjectionError> {
        self.events.lock().unwrap().push((vk, key_up));
        if self.should_fail {
            return Err(InjectionError::Blocked("mock failure".into()));
        }
        Ok(())
    }
}
