//! JSON file persistence for [`JoystickConfig`].
//!
//! The document lives in `joystick-config.json` inside the platform config
//! directory:
//! - Windows: `%APPDATA%\HotasNav\joystick-config.json`
//! - Linux:   `$XDG_CONFIG_HOME/hotas-nav/joystick-config.json`
//!   (falls back to `~/.config/hotas-nav/`)
//! - macOS:   `~/Library/Application Support/HotasNav/joystick-config.json`
//!
//! A missing file loads as the default (disabled, unmapped) configuration.

use std::path::{Path, PathBuf};

use hotas_core::JoystickConfig;
use tracing::{debug, info};

use crate::application::configure::{ConfigStore, PersistenceError};

/// File name of the configuration document.
pub const CONFIG_FILE_NAME: &str = "joystick-config.json";

/// Returns the platform-appropriate directory for hotas-nav settings.
///
/// # Errors
///
/// Returns [`PersistenceError::NoPlatformConfigDir`] if the relevant
/// environment variable (`APPDATA` or `HOME`) is not set.
pub fn platform_config_dir() -> Result<PathBuf, PersistenceError> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(|p| PathBuf::from(p).join("HotasNav"))
            .ok_or(PersistenceError::NoPlatformConfigDir)
    }
    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library/Application Support/HotasNav"))
            .ok_or(PersistenceError::NoPlatformConfigDir)
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return Ok(PathBuf::from(xdg).join("hotas-nav"));
        }
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join(".config/hotas-nav"))
            .ok_or(PersistenceError::NoPlatformConfigDir)
    }
}

/// [`ConfigStore`] reading and writing one JSON file.
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    /// Stores the document as `joystick-config.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CONFIG_FILE_NAME),
        }
    }

    /// Stores the document in [`platform_config_dir`].
    pub fn at_platform_location() -> Result<Self, PersistenceError> {
        Ok(Self::in_dir(platform_config_dir()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonConfigStore {
    fn load(&self) -> Result<JoystickConfig, PersistenceError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no joystick config yet, using defaults");
                return Ok(JoystickConfig::default());
            }
            Err(source) => {
                return Err(PersistenceError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| PersistenceError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, config: &JoystickConfig) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| PersistenceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let text = serde_json::to_string_pretty(config).map_err(PersistenceError::Serialize)?;
        std::fs::write(&self.path, text).map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), "joystick config written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hotas_core::ButtonMapping;
    use uuid::Uuid;

    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("hotas_nav_test_{}", Uuid::new_v4()))
    }

    #[test]
    fn test_missing_file_loads_default() {
        let store = JsonConfigStore::in_dir(temp_dir());
        assert_eq!(store.load().unwrap(), JoystickConfig::default());
    }

    #[test]
    fn test_save_creates_directory_and_round_trips() {
        // Arrange
        let dir = temp_dir().join("nested");
        let store = JsonConfigStore::in_dir(&dir);
        let config = JoystickConfig {
            enabled: true,
            device_id: 1,
            mapping: ButtonMapping {
                up: 1,
                down: 2,
                left: 3,
                right: 4,
            },
        };

        // Act
        store.save(&config).unwrap();
        let loaded = store.load().unwrap();

        // Assert
        assert_eq!(loaded, config);
        assert!(store.path().ends_with(CONFIG_FILE_NAME));
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_saved_file_is_pretty_printed_with_camel_case_keys() {
        let dir = temp_dir();
        let store = JsonConfigStore::in_dir(&dir);

        store.save(&JoystickConfig::default()).unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\n  \"deviceId\": 0"));
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_corrupt_file_is_a_parse_error() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let store = JsonConfigStore::in_dir(&dir);
        std::fs::write(store.path(), "{ not json").unwrap();

        let result = store.load();

        assert!(matches!(result, Err(PersistenceError::Parse { .. })));
        std::fs::remove_dir_all(dir).ok();
    }
}
