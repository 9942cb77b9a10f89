//! Joystick device adapters.
//!
//! `WinmmJoystick` (Windows) reads devices through the legacy multimedia
//! joystick API.  `MockJoystick` replays scripted bitmasks for tests.

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;
