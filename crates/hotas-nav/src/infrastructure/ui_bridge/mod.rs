//! Command bridge: exposes configurator operations to a front end.
//!
//! Every command returns a [`CommandResult`] so callers always receive the
//! same JSON shape: `{ success: bool, data: T | null, error: string | null }`.
//! Numeric arguments arrive as `f64` because that is what a JavaScript front
//! end sends; they are validated here before reaching the application layer.
//!
//! | Command        | Arguments            | Data on success          |
//! |----------------|----------------------|--------------------------|
//! | `list_devices` | –                    | `JoystickDevice[]`       |
//! | `load_config`  | –                    | `JoystickConfig`         |
//! | `save_config`  | JSON payload         | `"saved"`                |
//! | `set_device`   | `device: number`     | `null` (negatives ignored) |
//! | `capture`      | `direction, device`  | captured button number   |

use std::sync::Arc;

use hotas_core::{Direction, JoystickConfig};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::application::configure::Configurator;
use crate::application::device_query::{JoystickApi, JoystickDevice};

/// Status line shown when enumeration finds nothing.
pub const NO_DEVICES_MESSAGE: &str = "No HOTAS or joystick devices detected.";
/// Status line shown when a capture is cancelled or times out.
pub const CAPTURE_CANCELLED_MESSAGE: &str = "Capture cancelled.";
/// Status line shown after a successful save.
pub const SAVED_MESSAGE: &str = "Configuration saved.";

// ── Shared application state ──────────────────────────────────────────────────

/// State shared by all command handlers.
pub struct AppState {
    pub configurator: Configurator,
}

impl AppState {
    pub fn new(configurator: Configurator) -> Arc<Self> {
        Arc::new(Self { configurator })
    }
}

/// Unified response wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Lists joystick devices.  An empty list is a success.
pub async fn list_devices(state: Arc<AppState>) -> CommandResult<Vec<JoystickDevice>> {
    match state.configurator.list_devices() {
        Ok(devices) => CommandResult::ok(devices),
        Err(e) => {
            warn!("device enumeration failed: {e}");
            CommandResult::err(e.to_string())
        }
    }
}

/// Lists devices straight from `joystick`, without touching the stored
/// configuration.
pub fn list_devices_from(joystick: &dyn JoystickApi) -> CommandResult<Vec<JoystickDevice>> {
    match joystick.list_devices() {
        Ok(devices) => CommandResult::ok(devices),
        Err(e) => {
            warn!("device enumeration failed: {e}");
            CommandResult::err(e.to_string())
        }
    }
}

/// Returns the in-memory configuration.
pub async fn load_config(state: Arc<AppState>) -> CommandResult<JoystickConfig> {
    CommandResult::ok(state.configurator.config().await)
}

/// Replaces and persists the configuration from a JSON payload.
///
/// A payload without `mapping` clears every assignment.
pub async fn save_config(state: Arc<AppState>, payload: serde_json::Value) -> CommandResult<String> {
    let config: JoystickConfig = match serde_json::from_value(payload) {
        Ok(config) => config,
        Err(e) => return CommandResult::err(format!("invalid configuration: {e}")),
    };
    match state.configurator.save(config).await {
        Ok(()) => CommandResult::ok("saved".to_string()),
        Err(e) => CommandResult::err(format!("failed to save configuration: {e}")),
    }
}

/// Selects the device to poll.  Negative (or NaN) ids are ignored.
pub async fn set_device(state: Arc<AppState>, device: f64) -> CommandResult<()> {
    if let Some(id) = device_id(device) {
        state.configurator.set_device(id).await;
    }
    CommandResult::ok(())
}

/// Captures the next button pressed on `device` and binds it to `direction`.
pub async fn capture(state: Arc<AppState>, direction: String, device: f64) -> CommandResult<u32> {
    let direction: Direction = match direction.parse() {
        Ok(d) => d,
        Err(e) => return CommandResult::err(format!("{e}")),
    };
    let Some(device_id) = device_id(device) else {
        return CommandResult::err("invalid device id");
    };
    match state.configurator.capture(direction, device_id).await {
        Ok(button) => CommandResult::ok(button),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

fn device_id(device: f64) -> Option<u32> {
    if device >= 0.0 && device <= u32::MAX as f64 {
        Some(device as u32)
    } else {
        None
    }
}
