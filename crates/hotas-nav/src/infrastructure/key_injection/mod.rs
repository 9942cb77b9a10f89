//! Keyboard event injection adapters.
//!
//! `SendInputInjector` (Windows) synthesizes keys with `SendInput`.
//! `RecordingKeyInjector` records calls for tests.

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;
