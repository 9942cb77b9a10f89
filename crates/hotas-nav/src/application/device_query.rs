//! Joystick device port.
//!
//! Both the capture flow and the navigation runtime read button state through
//! [`JoystickApi`].  The Windows implementation talks to the multimedia
//! joystick API; tests use `infrastructure::joystick::mock`.

use hotas_core::ButtonBitmask;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

/// Failure to enumerate joystick devices.
#[derive(Debug, Error)]
pub enum DeviceQueryError {
    #[error("joystick subsystem unavailable: {0}")]
    Unavailable(String),
}

/// Failure to read a device's current button state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    /// The device slot exists but nothing is plugged in.
    #[error("joystick {0} is not connected")]
    Unplugged(u32),

    /// Any other non-success status returned by the OS.
    #[error("joystick {device_id} poll failed with status {code}")]
    Os { device_id: u32, code: u32 },
}

/// One joystick slot that answered a capability query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoystickDevice {
    /// OS slot index, passed back to [`JoystickApi::poll_buttons`].
    pub id: u32,
    /// Product name, or `"Joystick <id + 1>"` when the driver reports none.
    pub name: String,
    pub num_buttons: u32,
}

impl JoystickDevice {
    /// Builds a device entry, substituting a positional name for an empty one.
    pub fn new(id: u32, name: impl Into<String>, num_buttons: u32) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            format!("Joystick {}", id + 1)
        } else {
            name
        };
        Self {
            id,
            name,
            num_buttons,
        }
    }
}

/// Builds the device list for `slots` OS slots.
///
/// `caps` returns `(product name, button count)` for a slot, or `None` when
/// its capability lookup fails.  Such slots are skipped: legacy joystick APIs
/// report phantom and reserved slots that never answer.
pub fn enumerate_devices(
    slots: u32,
    caps: impl Fn(u32) -> Option<(String, u32)>,
) -> Vec<JoystickDevice> {
    (0..slots)
        .filter_map(|id| match caps(id) {
            Some((name, num_buttons)) => Some(JoystickDevice::new(id, name, num_buttons)),
            None => {
                trace!(id, "skipping joystick slot");
                None
            }
        })
        .collect()
}

/// Read-only access to joystick devices.
///
/// Both calls are synchronous and cheap enough to run every few milliseconds.
pub trait JoystickApi: Send + Sync {
    /// Lists every device slot that answers a capability query.
    ///
    /// Slots that fail the query are skipped.  No devices is an empty list.
    fn list_devices(&self) -> Result<Vec<JoystickDevice>, DeviceQueryError>;

    /// Reads the current button bitmask of `device_id`.
    fn poll_buttons(&self, device_id: u32) -> Result<ButtonBitmask, PollError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_falls_back_to_positional_label() {
        let device = JoystickDevice::new(0, "", 32);
        assert_eq!(device.name, "Joystick 1");
    }

    #[test]
    fn test_whitespace_name_falls_back_to_positional_label() {
        assert_eq!(JoystickDevice::new(3, "  ", 8).name, "Joystick 4");
    }

    // ── Enumeration ───────────────────────────────────────────────────────────

    #[test]
    fn test_enumerate_skips_slot_whose_lookup_fails() {
        // Arrange: slot 1 is a phantom legacy slot.
        let caps = |id: u32| match id {
            1 => None,
            _ => Some((format!("Stick {id}"), 12)),
        };

        // Act
        let devices = enumerate_devices(3, caps);

        // Assert
        let ids: Vec<u32> = devices.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![0, 2]);
        assert_eq!(devices[1].name, "Stick 2");
    }

    #[test]
    fn test_enumerate_zero_slots_is_empty() {
        let devices = enumerate_devices(0, |_| Some(("never".to_string(), 1)));
        assert!(devices.is_empty());
    }

    #[test]
    fn test_enumerate_all_slots_failing_is_empty_not_error() {
        assert!(enumerate_devices(16, |_| None).is_empty());
    }

    #[test]
    fn test_enumerate_applies_positional_name_fallback() {
        let devices = enumerate_devices(2, |id| Some((String::new(), id + 4)));
        assert_eq!(
            devices,
            vec![
                JoystickDevice::new(0, "Joystick 1", 4),
                JoystickDevice::new(1, "Joystick 2", 5)
            ]
        );
    }

    #[test]
    fn test_device_serializes_button_count_as_num_buttons() {
        let device = JoystickDevice::new(1, "Warthog Throttle", 32);
        let value = serde_json::to_value(&device).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "id": 1, "name": "Warthog Throttle", "numButtons": 32 })
        );
    }
}
