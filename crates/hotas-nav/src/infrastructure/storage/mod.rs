//! Persistent storage for the joystick configuration.
//!
//! `config` stores a pretty-printed JSON document on disk; `memory` is an
//! in-process store for tests.

pub mod config;
pub mod memory;
