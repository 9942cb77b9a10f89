//! Button assignments and the persisted joystick configuration.
//!
//! The on-disk document looks like:
//!
//! ```json
//! {
//!   "enabled": true,
//!   "deviceId": 0,
//!   "mapping": { "up": 1, "down": 2, "left": 3, "right": 4 }
//! }
//! ```
//!
//! Every field carries `#[serde(default)]`, so a missing `mapping` (or a
//! missing direction key inside it) loads as "unmapped" instead of failing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::direction::Direction;

/// Why a configuration cannot drive a navigation runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigInvalidError {
    /// Navigation is switched off.
    #[error("joystick navigation is disabled")]
    Disabled,

    /// A direction has no button assigned.
    #[error("no button mapped for direction {0}")]
    Unmapped(Direction),
}

/// Button index (1-based) for each direction.  `0` means unassigned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonMapping {
    pub up: u32,
    pub down: u32,
    pub left: u32,
    pub right: u32,
}

impl ButtonMapping {
    /// Returns the button assigned to `direction`, `0` when unassigned.
    pub fn get(&self, direction: Direction) -> u32 {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Assigns `button` to `direction`.  Passing `0` clears the assignment.
    pub fn set(&mut self, direction: Direction, button: u32) {
        match direction {
            Direction::Up => self.up = button,
            Direction::Down => self.down = button,
            Direction::Left => self.left = button,
            Direction::Right => self.right = button,
        }
    }

    /// Iterates `(direction, button)` pairs for assigned directions only.
    pub fn assigned(&self) -> impl Iterator<Item = (Direction, u32)> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |d| (d, self.get(d)))
            .filter(|(_, button)| *button != 0)
    }
}

/// Joystick navigation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JoystickConfig {
    /// Whether navigation should run at all.
    pub enabled: bool,
    /// OS joystick slot to poll.
    pub device_id: u32,
    /// Button per direction.
    pub mapping: ButtonMapping,
}

impl JoystickConfig {
    /// Checks that this configuration may start a navigation runtime.
    ///
    /// A disabled config is invalid regardless of its mapping.  Otherwise the
    /// first direction (in [`Direction::ALL`] order) without a button is
    /// reported.
    pub fn validate(&self) -> Result<(), ConfigInvalidError> {
        if !self.enabled {
            return Err(ConfigInvalidError::Disabled);
        }
        match Direction::ALL
            .into_iter()
            .find(|d| self.mapping.get(*d) == 0)
        {
            Some(direction) => Err(ConfigInvalidError::Unmapped(direction)),
            None => Ok(()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
