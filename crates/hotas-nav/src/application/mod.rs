//! Application layer use cases for HOTAS navigation.
//!
//! Use cases here orchestrate `hotas_core` domain types against OS-facing
//! ports declared as traits.  They contain no OS calls and no file access;
//! concrete adapters live in `crate::infrastructure`.
//!
//! # Sub-modules
//!
//! - **`device_query`** – the joystick port: enumerate devices and read one
//!   button bitmask.
//!
//! - **`capture_button`** – waits for the next physical button press on a
//!   device and reports its 1-based number.  Cancellable.
//!
//! - **`navigate`** – the polling runtime.  Every tick it checks focus,
//!   polls the device and turns button edges into arrow-key events.
//!
//! - **`configure`** – holds the editable configuration, serialises
//!   captures (one at a time, newest wins) and persists changes.

pub mod capture_button;
pub mod configure;
pub mod device_query;
pub mod navigate;
