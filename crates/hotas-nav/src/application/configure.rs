//! Configurator: the editable joystick configuration and the capture flow.
//!
//! The configurator is what the command surface talks to.  It keeps the
//! current [`JoystickConfig`] in memory, persists it through a
//! [`ConfigStore`], and runs button captures one at a time.
//!
//! # One capture at a time
//!
//! Starting a capture cancels whichever capture is in flight and then waits
//! for it to finish before taking its own baseline, so two captures never
//! observe the device together.  The "current capture" slot is a plain mutex
//! held only long enough to swap tokens; the wait happens on a separate async
//! gate.  Each capture also arms a timeout (15 seconds by default) that fires
//! the same cancellation token.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError};
use std::time::Duration;

use hotas_core::{Direction, JoystickConfig};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::capture_button::{capture_next_button, CaptureError, DEFAULT_CAPTURE_POLL_INTERVAL};
use super::device_query::{DeviceQueryError, JoystickApi, JoystickDevice};

/// How long a capture waits for a press before giving up.
pub const DEFAULT_CAPTURE_TIMEOUT: Duration = Duration::from_secs(15);

/// Error loading or saving the persisted configuration.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not a valid configuration document.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Persistence port for [`JoystickConfig`].
pub trait ConfigStore: Send + Sync {
    /// Loads the stored configuration.  A missing document is the default
    /// configuration, not an error.
    fn load(&self) -> Result<JoystickConfig, PersistenceError>;

    /// Replaces the stored configuration.
    fn save(&self, config: &JoystickConfig) -> Result<(), PersistenceError>;
}

/// Capture currently allowed to observe the device.
struct ActiveCapture {
    id: u64,
    cancel: CancellationToken,
}

/// Owns the editable configuration and serialises captures.
pub struct Configurator {
    config: Mutex<JoystickConfig>,
    store: Arc<dyn ConfigStore>,
    joystick: Arc<dyn JoystickApi>,
    current_capture: std::sync::Mutex<Option<ActiveCapture>>,
    capture_gate: Mutex<()>,
    next_capture_id: AtomicU64,
    capture_timeout: Duration,
    poll_interval: Duration,
}

impl Configurator {
    /// Loads the stored configuration and builds a configurator around it.
    ///
    /// # Errors
    ///
    /// Propagates [`PersistenceError`] from the store (a missing file is not
    /// an error).
    pub fn open(
        store: Arc<dyn ConfigStore>,
        joystick: Arc<dyn JoystickApi>,
    ) -> Result<Self, PersistenceError> {
        let config = store.load()?;
        debug!(?config, "joystick configuration loaded");
        Ok(Self {
            config: Mutex::new(config),
            store,
            joystick,
            current_capture: std::sync::Mutex::new(None),
            capture_gate: Mutex::new(()),
            next_capture_id: AtomicU64::new(1),
            capture_timeout: DEFAULT_CAPTURE_TIMEOUT,
            poll_interval: DEFAULT_CAPTURE_POLL_INTERVAL,
        })
    }

    /// Overrides the capture timeout and poll interval.
    pub fn with_capture_timing(mut self, timeout: Duration, poll_interval: Duration) -> Self {
        self.capture_timeout = timeout;
        self.poll_interval = poll_interval;
        self
    }

    pub fn list_devices(&self) -> Result<Vec<JoystickDevice>, DeviceQueryError> {
        self.joystick.list_devices()
    }

    /// Returns a copy of the in-memory configuration.
    pub async fn config(&self) -> JoystickConfig {
        self.config.lock().await.clone()
    }

    /// Replaces the in-memory configuration with `config` and persists it.
    pub async fn save(&self, config: JoystickConfig) -> Result<(), PersistenceError> {
        let mut current = self.config.lock().await;
        *current = config;
        self.store.save(&current)?;
        info!("joystick configuration saved");
        Ok(())
    }

    /// Persists the in-memory configuration as it stands.
    pub async fn persist(&self) -> Result<(), PersistenceError> {
        let current = self.config.lock().await;
        self.store.save(&current)
    }

    /// Selects the device to poll.  Not persisted until saved.
    pub async fn set_device(&self, device_id: u32) {
        self.config.lock().await.device_id = device_id;
    }

    /// Switches navigation on or off.  Not persisted until saved.
    pub async fn set_enabled(&self, enabled: bool) {
        self.config.lock().await.enabled = enabled;
    }

    /// Captures the next button on `device_id` and assigns it to `direction`.
    ///
    /// Any capture already in flight is cancelled and has finished before this
    /// one takes its baseline.  On success the mapping and the selected device
    /// are updated in memory (not persisted).
    ///
    /// # Errors
    ///
    /// [`CaptureError::Cancelled`] on timeout or when superseded;
    /// [`CaptureError::Device`] when the device cannot be read.
    pub async fn capture(&self, direction: Direction, device_id: u32) -> Result<u32, CaptureError> {
        let cancel = CancellationToken::new();
        let id = self.next_capture_id.fetch_add(1, Ordering::Relaxed);
        if let Some(previous) = self.swap_capture(Some(ActiveCapture {
            id,
            cancel: cancel.clone(),
        })) {
            debug!(superseded = previous.id, by = id, "cancelling previous capture");
            previous.cancel.cancel();
        }

        // Held until this capture stops observing the device.
        let _gate = self.capture_gate.lock().await;

        let timeout = {
            let cancel = cancel.clone();
            let limit = self.capture_timeout;
            tokio::spawn(async move {
                tokio::time::sleep(limit).await;
                cancel.cancel();
            })
        };

        info!(%direction, device_id, "press a button to capture");
        let result =
            capture_next_button(self.joystick.as_ref(), device_id, &cancel, self.poll_interval)
                .await;
        timeout.abort();
        self.clear_capture(id);

        let button = result?;
        let mut config = self.config.lock().await;
        config.mapping.set(direction, button);
        config.device_id = device_id;
        info!(%direction, button, device_id, "button captured");
        Ok(button)
    }

    /// Cancels the in-flight capture, if any.
    pub fn cancel_capture(&self) {
        if let Some(active) = self.swap_capture(None) {
            active.cancel.cancel();
        }
    }

    fn swap_capture(&self, next: Option<ActiveCapture>) -> Option<ActiveCapture> {
        let mut slot = self
            .current_capture
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, next)
    }

    /// Empties the slot only if it still holds capture `id`; a newer capture
    /// may already have replaced it.
    fn clear_capture(&self, id: u64) {
        let mut slot = self
            .current_capture
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|active| active.id == id) {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use hotas_core::ButtonMapping;

    use super::*;
    use crate::infrastructure::joystick::mock::MockJoystick;
    use crate::infrastructure::storage::memory::InMemoryConfigStore;

    const FAST: Duration = Duration::from_millis(2);

    fn configurator(
        store: Arc<InMemoryConfigStore>,
        joystick: Arc<MockJoystick>,
    ) -> Arc<Configurator> {
        Arc::new(
            Configurator::open(store, joystick)
                .unwrap()
                .with_capture_timing(Duration::from_secs(5), FAST),
        )
    }

    // ── Config editing ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_open_uses_stored_configuration() {
        let stored = JoystickConfig {
            enabled: true,
            device_id: 3,
            mapping: ButtonMapping::default(),
        };
        let store = Arc::new(InMemoryConfigStore::with(stored.clone()));
        let cfg = configurator(store, Arc::new(MockJoystick::new()));

        assert_eq!(cfg.config().await, stored);
    }

    #[tokio::test]
    async fn test_save_replaces_memory_and_store() {
        let store = Arc::new(InMemoryConfigStore::new());
        let cfg = configurator(Arc::clone(&store), Arc::new(MockJoystick::new()));
        let mut next = JoystickConfig::default();
        next.enabled = true;
        next.mapping.up = 5;

        cfg.save(next.clone()).await.unwrap();

        assert_eq!(cfg.config().await, next);
        assert_eq!(store.saved(), Some(next));
    }

    #[tokio::test]
    async fn test_set_device_is_not_persisted_until_saved() {
        let store = Arc::new(InMemoryConfigStore::new());
        let cfg = configurator(Arc::clone(&store), Arc::new(MockJoystick::new()));

        cfg.set_device(2).await;

        assert_eq!(cfg.config().await.device_id, 2);
        assert_eq!(store.saved(), None);
        cfg.persist().await.unwrap();
        assert_eq!(store.saved().map(|c| c.device_id), Some(2));
    }

    // ── Capture ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_capture_assigns_button_and_selects_device() {
        // Arrange
        let joystick = Arc::new(MockJoystick::new());
        joystick.push_bits(0);
        joystick.push_bits(0b1_0000);
        let cfg = configurator(Arc::new(InMemoryConfigStore::new()), joystick);

        // Act
        let button = cfg.capture(Direction::Left, 1).await;

        // Assert
        assert_eq!(button, Ok(5));
        let config = cfg.config().await;
        assert_eq!(config.mapping.left, 5);
        assert_eq!(config.device_id, 1);
    }

    #[tokio::test]
    async fn test_failed_capture_leaves_config_untouched() {
        let joystick = Arc::new(MockJoystick::new());
        joystick.push_error(crate::application::device_query::PollError::Unplugged(0));
        let cfg = configurator(Arc::new(InMemoryConfigStore::new()), joystick);

        let result = cfg.capture(Direction::Up, 0).await;

        assert!(matches!(result, Err(CaptureError::Device(_))));
        assert_eq!(cfg.config().await, JoystickConfig::default());
    }

    #[tokio::test]
    async fn test_capture_times_out_as_cancelled() {
        let cfg = Arc::new(
            Configurator::open(
                Arc::new(InMemoryConfigStore::new()),
                Arc::new(MockJoystick::new()),
            )
            .unwrap()
            .with_capture_timing(Duration::from_millis(20), FAST),
        );

        let result = tokio::time::timeout(Duration::from_secs(2), cfg.capture(Direction::Down, 0))
            .await
            .expect("timeout must cancel the capture");

        assert_eq!(result, Err(CaptureError::Cancelled));
    }

    #[tokio::test]
    async fn test_second_capture_cancels_first_before_observing() {
        // Arrange: nothing pressed while the first capture runs.
        let joystick = Arc::new(MockJoystick::new());
        let cfg = configurator(Arc::new(InMemoryConfigStore::new()), Arc::clone(&joystick));
        let first = tokio::spawn({
            let cfg = Arc::clone(&cfg);
            async move { cfg.capture(Direction::Up, 0).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Act: second capture starts; the user then presses button 2.
        let second = tokio::spawn({
            let cfg = Arc::clone(&cfg);
            async move { cfg.capture(Direction::Right, 0).await }
        });
        let first_result = first.await.unwrap();
        joystick.push_bits(0);
        joystick.push_bits(0b10);
        let second_result = second.await.unwrap();

        // Assert
        assert_eq!(first_result, Err(CaptureError::Cancelled));
        assert_eq!(second_result, Ok(2));
        let config = cfg.config().await;
        assert_eq!(config.mapping.up, 0);
        assert_eq!(config.mapping.right, 2);
    }

    #[tokio::test]
    async fn test_finished_capture_does_not_clear_newer_slot() {
        let joystick = Arc::new(MockJoystick::new());
        let cfg = configurator(Arc::new(InMemoryConfigStore::new()), joystick);

        // Simulate a newer capture having installed itself.
        let newer = CancellationToken::new();
        cfg.swap_capture(Some(ActiveCapture {
            id: 99,
            cancel: newer.clone(),
        }));
        cfg.clear_capture(1);

        cfg.cancel_capture();
        assert!(newer.is_cancelled());
    }
}
