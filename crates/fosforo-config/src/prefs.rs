//! Host preferences that survive a worker rebuild.
//!
//! A renderer switch after first use cannot happen in place: the host
//! tears the worker down and re-initializes with the requested backend.
//! The request must survive that rebuild (and a process restart), so it
//! lands here, in `prefs.toml` under the user config directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;
use crate::paths::user_config_dir;

/// File name under the config directory.
const PREFS_FILE: &str = "prefs.toml";

/// Persisted host-side preferences.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostPrefs {
    /// Preferred renderer backend name ("software" or "gpu"); `None`
    /// lets the host pick.
    pub renderer: Option<String>,
    /// Preset applied at startup, by name.
    pub startup_preset: Option<String>,
}

impl HostPrefs {
    /// Default location of the preferences file.
    pub fn default_path() -> PathBuf {
        user_config_dir().join(PREFS_FILE)
    }

    /// Load preferences from a file; a missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::read_file(path, e)),
        }
    }

    /// Save preferences, creating the parent directory as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|e| ConfigError::write_file(path, e))
    }
}
