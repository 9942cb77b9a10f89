//! # hotas-core
//!
//! Shared domain library for HOTAS navigation.  It holds everything that can
//! be reasoned about without touching the operating system:
//!
//! - **`domain`** – the four navigation [`Direction`]s, the persisted
//!   [`JoystickConfig`] and its validity rule, the raw [`ButtonBitmask`]
//!   read from a device, and [`PressState`], which turns consecutive
//!   bitmasks into key-down / key-up transitions.
//!
//! - **`keymap`** – the fixed table from a direction to the Windows virtual
//!   key code that is injected for it (the arrow keys).
//!
//! The crate has no OS, async, or I/O dependencies so every rule here can be
//! unit-tested on any platform.

pub mod domain;
pub mod keymap;

pub use domain::bitmask::ButtonBitmask;
pub use domain::config::{ButtonMapping, ConfigInvalidError, JoystickConfig};
pub use domain::direction::{Direction, UnknownDirectionError};
pub use domain::press_state::{KeyTransition, PressState};
