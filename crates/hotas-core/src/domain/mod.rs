//! Domain entities for HOTAS navigation.
//!
//! Pure data types and rules with no infrastructure dependencies.  Outer
//! layers (device polling, key injection, storage) depend on these types,
//! never the other way round.

/// The closed set of navigation directions.
pub mod direction;

/// Button assignments and the enabled/device selection persisted on disk.
pub mod config;

/// Raw 32-button state as reported by a device poll.
pub mod bitmask;

/// Per-direction logical press state and edge detection.
pub mod press_state;
