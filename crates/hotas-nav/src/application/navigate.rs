//! Navigation runtime: joystick buttons to arrow keys for one window.
//!
//! A [`NavigationRuntime`] owns one background task that ticks on a fixed
//! period (30ms by default).  Each tick is handled by [`Navigator::tick`]:
//!
//! ```text
//! target window focused? ──no──▶ release every held direction, done
//!        │yes
//!        ▼
//! poll device ──error──▶ skip tick (no state change, no events)
//!        │ok
//!        ▼
//! PressState::apply ──▶ one key-down / key-up per changed direction
//! ```
//!
//! The runtime works on a snapshot of [`JoystickConfig`] taken at start.
//! Editing the configuration afterwards has no effect until the runtime is
//! stopped and a new one started.
//!
//! # Stopping
//!
//! [`NavigationRuntime::stop`] signals the task and waits for it to finish.
//! The task releases every held direction before exiting, after any tick in
//! progress has completed.  Only the first stop request does anything; later
//! or concurrent calls wait for the same shutdown.  Dropping the runtime
//! requests a stop without waiting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hotas_core::keymap::direction_to_vk;
use hotas_core::{ConfigInvalidError, JoystickConfig, KeyTransition, PressState};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use super::device_query::JoystickApi;

/// Tick period used when none is configured.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(30);

// ── Ports ─────────────────────────────────────────────────────────────────────

/// Opaque OS window identity (an `HWND` on Windows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

/// Reports which window currently has keyboard focus.
pub trait ForegroundWindow: Send + Sync {
    /// Returns the foreground window, or `None` if no window is active.
    fn foreground_window(&self) -> Option<WindowHandle>;
}

/// Error returned by a [`KeyInjector`].
#[derive(Debug, Error)]
pub enum InjectionError {
    /// The OS accepted none of the submitted events.
    #[error("key event was blocked by the OS: {0}")]
    Blocked(String),
}

/// Synthesizes keyboard events at the OS level.
pub trait KeyInjector: Send + Sync {
    /// Sends a key-down (`key_up == false`) or key-up for virtual key `vk`.
    fn send_key(&self, vk: u16, key_up: bool) -> Result<(), InjectionError>;
}

/// The three OS-facing collaborators a navigator needs.
#[derive(Clone)]
pub struct NavigationPorts {
    pub joystick: Arc<dyn JoystickApi>,
    pub focus: Arc<dyn ForegroundWindow>,
    pub injector: Arc<dyn KeyInjector>,
}

// ── Per-tick logic ────────────────────────────────────────────────────────────

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Target window not focused; held directions were released.
    Unfocused,
    /// Device poll failed; nothing changed.
    PollFailed,
    /// Device polled and diffed; `transitions` key events were sent.
    Polled { transitions: usize },
}

/// Sequential tick processor.  Owns the press state exclusively.
pub struct Navigator {
    config: JoystickConfig,
    target: WindowHandle,
    ports: NavigationPorts,
    state: PressState,
    focused: bool,
}

impl Navigator {
    /// Creates a navigator for a validated configuration snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigInvalidError`] if `config` is disabled or has an
    /// unmapped direction.
    pub fn new(
        config: JoystickConfig,
        target: WindowHandle,
        ports: NavigationPorts,
    ) -> Result<Self, ConfigInvalidError> {
        config.validate()?;
        Ok(Self {
            config,
            target,
            ports,
            state: PressState::new(),
            focused: true,
        })
    }

    /// Runs one focus check / poll / diff cycle.
    pub fn tick(&mut self) -> TickOutcome {
        let focused = self.ports.focus.foreground_window() == Some(self.target);
        if focused != self.focused {
            debug!(focused, "target window focus changed");
            self.focused = focused;
        }
        if !focused {
            self.release_all();
            return TickOutcome::Unfocused;
        }

        let bitmask = match self.ports.joystick.poll_buttons(self.config.device_id) {
            Ok(bits) => bits,
            Err(e) => {
                trace!("skipping tick: {e}");
                return TickOutcome::PollFailed;
            }
        };

        let transitions = self.state.apply(&self.config.mapping, bitmask);
        self.emit(&transitions);
        TickOutcome::Polled {
            transitions: transitions.len(),
        }
    }

    /// Sends a key-up for every direction still held and clears them.
    pub fn release_all(&mut self) {
        let transitions = self.state.release_all();
        if !transitions.is_empty() {
            debug!(count = transitions.len(), "releasing held directions");
        }
        self.emit(&transitions);
    }

    pub fn state(&self) -> &PressState {
        &self.state
    }

    fn emit(&self, transitions: &[KeyTransition]) {
        for transition in transitions {
            let vk = direction_to_vk(transition.direction);
            trace!(
                direction = %transition.direction,
                pressed = transition.pressed,
                "injecting key"
            );
            if let Err(e) = self.ports.injector.send_key(vk, !transition.pressed) {
                warn!(direction = %transition.direction, "key injection failed: {e}");
            }
        }
    }
}

// ── Background runtime ────────────────────────────────────────────────────────

/// Why a [`NavigationRuntime`] could not start.
#[derive(Debug, Error)]
pub enum StartError {
    #[error(transparent)]
    InvalidConfig(#[from] ConfigInvalidError),

    /// `start` was called outside a Tokio runtime.
    #[error("no Tokio runtime to run navigation on")]
    NoRuntime,
}

/// A running navigation loop.  Stopped state is terminal.
pub struct NavigationRuntime {
    stop_tx: watch::Sender<bool>,
    stopped: AtomicBool,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl NavigationRuntime {
    /// Validates `config` and spawns the tick loop on the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// - [`StartError::InvalidConfig`] if `config` cannot drive navigation.
    /// - [`StartError::NoRuntime`] if no Tokio runtime is current.
    ///
    /// Nothing is spawned on error.
    pub fn start(
        config: JoystickConfig,
        target: WindowHandle,
        ports: NavigationPorts,
        period: Duration,
    ) -> Result<Self, StartError> {
        let device_id = config.device_id;
        let mut navigator = Navigator::new(config, target, ports)?;
        let runtime = Handle::try_current().map_err(|_| StartError::NoRuntime)?;
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = runtime.spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = stop_rx.changed() => break,
                    _ = ticker.tick() => {
                        navigator.tick();
                    }
                }
            }
            navigator.release_all();
            info!(device_id, "navigation runtime stopped");
        });

        info!(device_id, ?target, period_ms = period.as_millis() as u64, "navigation runtime started");
        Ok(Self {
            stop_tx,
            stopped: AtomicBool::new(false),
            task: Mutex::new(Some(task)),
        })
    }

    /// Signals the loop to stop without waiting.  Returns `true` only for the
    /// first request.
    pub fn request_stop(&self) -> bool {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return false;
        }
        // The receiver only disappears once the task has already exited.
        let _ = self.stop_tx.send(true);
        true
    }

    /// Stops the loop and waits until held directions have been released.
    pub async fn stop(&self) {
        self.request_stop();
        let mut task = self.task.lock().await;
        if let Some(handle) = task.take() {
            if let Err(e) = handle.await {
                warn!("navigation task ended abnormally: {e}");
            }
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl Drop for NavigationRuntime {
    fn drop(&mut self) {
        self.request_stop();
    }
}
