//! Infrastructure layer for hotas-nav.
//!
//! Contains OS-facing adapters (joystick polling, foreground-window query,
//! key injection), JSON file storage, and the UI command bridge.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `hotas_core`, but MUST NOT be imported by the `application` layer
//! (tests excepted, which borrow the mocks).

pub mod focus;
pub mod joystick;
pub mod key_injection;
pub mod storage;
pub mod ui_bridge;
