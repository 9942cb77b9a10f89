//! In-memory [`ConfigStore`] used by tests.

use std::sync::Mutex;

use hotas_core::JoystickConfig;

use crate::application::configure::{ConfigStore, PersistenceError};

/// Keeps the "persisted" configuration in memory.
#[derive(Default)]
pub struct InMemoryConfigStore {
    initial: JoystickConfig,
    saved: Mutex<Option<JoystickConfig>>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose first load returns `config`.
    pub fn with(config: JoystickConfig) -> Self {
        Self {
            initial: config,
            ..Self::default()
        }
    }

    /// Last configuration passed to `save`, if any.
    pub fn saved(&self) -> Option<JoystickConfig> {
        self.saved.lock().unwrap().clone()
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn load(&self) -> Result<JoystickConfig, PersistenceError> {
        Ok(self.saved().unwrap_or_else(|| self.initial.clone()))
    }

    fn save(&self, config: &JoystickConfig) -> Result<(), PersistenceError> {
        *self.saved.lock().unwrap() = Some(config.clone());
        Ok(())
    }
}
