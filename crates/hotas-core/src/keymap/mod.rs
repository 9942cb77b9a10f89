//! Key codes injected for each navigation direction.
//!
//! Only Windows virtual-key codes exist today: the adapters that inject input
//! are Windows-only.

pub mod windows_vk;

pub use windows_vk::direction_to_vk;
