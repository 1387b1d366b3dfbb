//! # JSON File Storage
//!
//! One pretty-printed JSON document per store, each at its own path.
//!
//! Writes go to a sibling `.tmp` file first and are then renamed over the
//! target, so a crash mid-write leaves the previous document intact.

use super::Storage;
use crate::formats::{
    catalog_from_json, catalog_to_json, goal_from_json, goal_to_json, record_from_json,
    record_to_json,
};
use crate::primitives::{DEFAULT_CATALOG_FILE, DEFAULT_GOAL_FILE, DEFAULT_RECORD_FILE};
use crate::{ConsumptionRecord, DailyGoal, FoodCatalog, NomError, StoreKind};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File-backed storage for the three stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonStorage {
    catalog_path: PathBuf,
    record_path: PathBuf,
    goal_path: PathBuf,
}

impl JsonStorage {
    /// Storage with explicit paths for each store.
    #[must_use]
    pub fn new(
        catalog_path: impl Into<PathBuf>,
        record_path: impl Into<PathBuf>,
        goal_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            record_path: record_path.into(),
            goal_path: goal_path.into(),
        }
    }

    /// Storage using the default file names inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(
            dir.join(DEFAULT_CATALOG_FILE),
            dir.join(DEFAULT_RECORD_FILE),
            dir.join(DEFAULT_GOAL_FILE),
        )
    }

    #[must_use]
    pub fn path(&self, store: StoreKind) -> &Path {
        match store {
            StoreKind::Catalog => &self.catalog_path,
            StoreKind::Record => &self.record_path,
            StoreKind::Goal => &self.goal_path,
        }
    }

    /// Whether the file backing `store` exists.
    #[must_use]
    pub fn exists(&self, store: StoreKind) -> bool {
        self.path(store).is_file()
    }

    fn read_text(&self, store: StoreKind) -> Result<Option<String>, NomError> {
        match fs::read_to_string(self.path(store)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                Err(NomError::DataConversion(e.to_string()))
            }
            Err(e) => Err(NomError::Io(format!(
                "{}: {}",
                self.path(store).display(),
                e
            ))),
        }
    }

    fn write_text(&self, store: StoreKind, text: &str) -> Result<(), NomError> {
        let path = self.path(store);
        let persistence = |e: std::io::Error| NomError::Persistence {
            store,
            reason: format!("{}: {}", path.display(), e),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(persistence)?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, text).map_err(persistence)?;
        fs::rename(&tmp, path).map_err(persistence)
    }
}

impl Storage for JsonStorage {
    fn read_catalog(&self) -> Result<Option<FoodCatalog>, NomError> {
        self.read_text(StoreKind::Catalog)?
            .map(|text| catalog_from_json(&text))
            .transpose()
    }

    fn save_catalog(&self, catalog: &FoodCatalog) -> Result<(), NomError> {
        let text = catalog_to_json(catalog)?;
        self.write_text(StoreKind::Catalog, &text)
    }

    fn read_record(&self) -> Result<Option<ConsumptionRecord>, NomError> {
        self.read_text(StoreKind::Record)?
            .map(|text| record_from_json(&text))
            .transpose()
    }

    fn save_record(&self, record: &ConsumptionRecord) -> Result<(), NomError> {
        let text = record_to_json(record)?;
        self.write_text(StoreKind::Record, &text)
    }

    fn read_goal(&self) -> Result<Option<DailyGoal>, NomError> {
        self.read_text(StoreKind::Goal)?
            .map(|text| goal_from_json(&text))
            .transpose()
    }

    fn save_goal(&self, goal: &DailyGoal) -> Result<(), NomError> {
        let text = goal_to_json(goal)?;
        self.write_text(StoreKind::Goal, &text)
    }
}

// =============================================================================
// TESTS
// =============================================================================
