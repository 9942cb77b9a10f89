//! Foreground-window adapters.

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;
