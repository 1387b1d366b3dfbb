//! # Storage
//!
//! The three independent record stores and model bootstrap.
//!
//! ## Read classification
//!
//! Every `read_*` distinguishes three outcomes:
//! - `Ok(None)`: the store does not exist yet ("not found")
//! - `Err(NomError::DataConversion)`: the store exists but is malformed
//! - `Err(NomError::Io)`: anything else went wrong reading it
//!
//! ## Backends
//!
//! - `JsonStorage`: one JSON file per store
//! - `MemoryStorage`: in-process documents (volatile)

mod json_store;
mod memory;

pub use json_store::JsonStorage;
pub use memory::MemoryStorage;

use crate::sample::sample_catalog;
use crate::sink::{LogLevel, LogSink};
use crate::{ConsumptionRecord, DailyGoal, FoodCatalog, Model, NomError, StoreKind};

const TARGET: &str = "nomnom_core::storage";

/// Persistence for the catalog, the consumption record and the goal.
///
/// The three stores are independent: a failed write to one never affects the
/// others.
pub trait Storage {
    fn read_catalog(&self) -> Result<Option<FoodCatalog>, NomError>;

    fn save_catalog(&self, catalog: &FoodCatalog) -> Result<(), NomError>;

    fn read_record(&self) -> Result<Option<ConsumptionRecord>, NomError>;

    fn save_record(&self, record: &ConsumptionRecord) -> Result<(), NomError>;

    fn read_goal(&self) -> Result<Option<DailyGoal>, NomError>;

    fn save_goal(&self, goal: &DailyGoal) -> Result<(), NomError>;
}

/// Load a model from `storage`, falling back per store.
///
/// - not found: sample catalog / empty record / unset goal
/// - malformed: empty catalog / empty record / unset goal, with a warning
/// - I/O failure: propagated
pub fn bootstrap<S: Storage + ?Sized>(storage: &S, sink: &dyn LogSink) -> Result<Model, NomError> {
    let catalog = load_or(
        storage.read_catalog(),
        StoreKind::Catalog,
        sink,
        sample_catalog,
        FoodCatalog::new,
    )?;
    let record = load_or(
        storage.read_record(),
        StoreKind::Record,
        sink,
        || Ok(ConsumptionRecord::new()),
        ConsumptionRecord::new,
    )?;
    let goal = load_or(
        storage.read_goal(),
        StoreKind::Goal,
        sink,
        || Ok(DailyGoal::unset()),
        DailyGoal::unset,
    )?;

    sink.log(
        LogLevel::Info,
        TARGET,
        &format!(
            "Loaded {} foods, {} logged days, goal {}",
            catalog.len(),
            record.len(),
            goal.get()
        ),
    );
    Ok(Model::with_state(catalog, record, goal))
}

fn load_or<T>(
    read: Result<Option<T>, NomError>,
    store: StoreKind,
    sink: &dyn LogSink,
    when_missing: impl FnOnce() -> Result<T, NomError>,
    when_malformed: impl FnOnce() -> T,
) -> Result<T, NomError> {
    match read {
        Ok(Some(value)) => Ok(value),
        Ok(None) => {
            sink.log(
                LogLevel::Info,
                TARGET,
                &format!("No {} store found, starting with defaults", store),
            );
            when_missing()
        }
        Err(NomError::DataConversion(reason)) => {
            sink.log(
                LogLevel::Warn,
                TARGET,
                &format!(
                    "{} store is not in the correct format ({}), starting empty",
                    store, reason
                ),
            );
            Ok(when_malformed())
        }
        Err(e) => {
            sink.log(
                LogLevel::Error,
                TARGET,
                &format!("Problem reading {} store: {}", store, e),
            );
            Err(e)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelOps;
    use crate::sink::MemorySink;

    #[test]
    fn missing_stores_bootstrap_with_samples() {
        let storage = MemoryStorage::new();
        let sink = MemorySink::new();
        let model = bootstrap(&storage, &sink).expect("bootstrap");

        assert!(!model.catalog().is_empty());
        assert!(model.record().is_empty());
        assert!(!model.goal().is_set());
        assert!(sink.messages_at(LogLevel::Warn).is_empty());
    }

    #[test]
    fn malformed_catalog_bootstraps_empty_with_warning() {
        let storage = MemoryStorage::new();
        storage.put_raw(StoreKind::Catalog, "{ nope");
        let sink = MemorySink::new();
        let model = bootstrap(&storage, &sink).expect("bootstrap");

        assert!(model.catalog().is_empty());
        assert_eq!(sink.messages_at(LogLevel::Warn).len(), 1);
    }

    #[test]
    fn stored_goal_is_restored() {
        let storage = MemoryStorage::new();
        storage
            .save_goal(&DailyGoal::new(2100).expect("goal"))
            .expect("save");
        let model = bootstrap(&storage, &MemorySink::new()).expect("bootstrap");
        assert_eq!(model.goal().get(), 2100);
    }
}
