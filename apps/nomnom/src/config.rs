//! # Preferences
//!
//! User preferences kept in a small TOML file: where the three stores live.
//!
//! ```toml
//! data_dir = "data"
//! catalog_file = "foodlist.json"
//! record_file = "record.json"
//! goal_file = "goal.json"
//! ```
//!
//! A missing file yields the defaults. A malformed file is reported and
//! also yields the defaults; it is never fatal, and it is never overwritten
//! by [`Preferences::save_back`].

use nomnom_core::primitives::{DEFAULT_CATALOG_FILE, DEFAULT_GOAL_FILE, DEFAULT_RECORD_FILE};
use nomnom_core::{JsonStorage, NomError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default preferences file name.
pub const DEFAULT_PREFERENCES_FILE: &str = "preferences.toml";

/// Default directory for the stores.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Where loaded preferences came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferencesSource {
    /// Parsed from the file.
    File,
    /// No file yet; defaults.
    Missing,
    /// The file exists but could not be read or parsed; defaults.
    Unreadable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub data_dir: PathBuf,
    pub catalog_file: String,
    pub record_file: String,
    pub goal_file: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            catalog_file: DEFAULT_CATALOG_FILE.to_string(),
            record_file: DEFAULT_RECORD_FILE.to_string(),
            goal_file: DEFAULT_GOAL_FILE.to_string(),
        }
    }
}

impl Preferences {
    /// Read preferences from `path`, falling back to defaults.
    pub fn load(path: &Path) -> (Self, PreferencesSource) {
        match std::fs::read_to_string(path) {
            Ok(text) => match Self::from_toml(&text) {
                Ok(prefs) => (prefs, PreferencesSource::File),
                Err(e) => {
                    tracing::warn!(
                        "Preferences file {} is not in the correct format, using defaults: {}",
                        path.display(),
                        e
                    );
                    (Self::default(), PreferencesSource::Unreadable)
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No preferences file at {}, using defaults", path.display());
                (Self::default(), PreferencesSource::Missing)
            }
            Err(e) => {
                tracing::warn!(
                    "Problem reading preferences file {}, using defaults: {}",
                    path.display(),
                    e
                );
                (Self::default(), PreferencesSource::Unreadable)
            }
        }
    }

    /// Write loaded preferences back to `path`, unless the file there could
    /// not be read. Returns whether anything was written.
    pub fn save_back(&self, path: &Path, source: PreferencesSource) -> Result<bool, NomError> {
        if source == PreferencesSource::Unreadable {
            tracing::debug!("Leaving unreadable preferences file {} untouched", path.display());
            return Ok(false);
        }
        self.save(path)?;
        Ok(true)
    }

    pub fn from_toml(text: &str) -> Result<Self, NomError> {
        toml::from_str(text).map_err(|e| NomError::DataConversion(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, NomError> {
        toml::to_string(self).map_err(|e| NomError::DataConversion(e.to_string()))
    }

    /// Write preferences to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), NomError> {
        let text = self.to_toml()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| NomError::Io(e.to_string()))?;
        }
        std::fs::write(path, text).map_err(|e| NomError::Io(e.to_string()))
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(&self.catalog_file)
    }

    pub fn record_path(&self) -> PathBuf {
        self.data_dir.join(&self.record_file)
    }

    pub fn goal_path(&self) -> PathBuf {
        self.data_dir.join(&self.goal_file)
    }

    /// JSON storage over the configured paths.
    pub fn storage(&self) -> JsonStorage {
        JsonStorage::new(self.catalog_path(), self.record_path(), self.goal_path())
    }
}
