//! # In-Memory Storage
//!
//! Volatile storage that keeps each store as its encoded JSON text, so the
//! same decode path and read classification apply as for files.
//!
//! Writes can be made to fail per store, and every successful write is
//! recorded in order.

use super::Storage;
use crate::formats::{
    catalog_from_json, catalog_to_json, goal_from_json, goal_to_json, record_from_json,
    record_to_json,
};
use crate::{ConsumptionRecord, DailyGoal, FoodCatalog, NomError, StoreKind};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: RefCell<BTreeMap<StoreKind, String>>,
    writes: RefCell<Vec<StoreKind>>,
    failing: RefCell<BTreeSet<StoreKind>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later write to `store` fail with `NomError::Persistence`.
    pub fn fail_writes(&self, store: StoreKind) {
        self.failing.borrow_mut().insert(store);
    }

    /// Let writes to `store` succeed again.
    pub fn heal(&self, store: StoreKind) {
        self.failing.borrow_mut().remove(&store);
    }

    /// Stores written so far, in write order.
    #[must_use]
    pub fn writes(&self) -> Vec<StoreKind> {
        self.writes.borrow().clone()
    }

    /// Replace the raw text of a store.
    pub fn put_raw(&self, store: StoreKind, text: impl Into<String>) {
        self.documents.borrow_mut().insert(store, text.into());
    }

    /// Raw text of a store, if present.
    #[must_use]
    pub fn raw(&self, store: StoreKind) -> Option<String> {
        self.documents.borrow().get(&store).cloned()
    }

    fn read_with<T>(
        &self,
        store: StoreKind,
        decode: impl FnOnce(&str) -> Result<T, NomError>,
    ) -> Result<Option<T>, NomError> {
        self.documents
            .borrow()
            .get(&store)
            .map(|text| decode(text))
            .transpose()
    }

    fn write(&self, store: StoreKind, text: Result<String, NomError>) -> Result<(), NomError> {
        if self.failing.borrow().contains(&store) {
            return Err(NomError::Persistence {
                store,
                reason: format!("{} store is not writable", store),
            });
        }
        self.documents.borrow_mut().insert(store, text?);
        self.writes.borrow_mut().push(store);
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn read_catalog(&self) -> Result<Option<FoodCatalog>, NomError> {
        self.read_with(StoreKind::Catalog, catalog_from_json)
    }

    fn save_catalog(&self, catalog: &FoodCatalog) -> Result<(), NomError> {
        self.write(StoreKind::Catalog, catalog_to_json(catalog))
    }

    fn read_record(&self) -> Result<Option<ConsumptionRecord>, NomError> {
        self.read_with(StoreKind::Record, record_from_json)
    }

    fn save_record(&self, record: &ConsumptionRecord) -> Result<(), NomError> {
        self.write(StoreKind::Record, record_to_json(record))
    }

    fn read_goal(&self) -> Result<Option<DailyGoal>, NomError> {
        self.read_with(StoreKind::Goal, goal_from_json)
    }

    fn save_goal(&self, goal: &DailyGoal) -> Result<(), NomError> {
        self.write(StoreKind::Goal, goal_to_json(goal))
    }
}
