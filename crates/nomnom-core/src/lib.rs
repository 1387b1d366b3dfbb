//! # nomnom-core
//!
//! The food catalog, consumption log and caloric goal for nomnom - THE CORE.
//!
//! This crate owns every invariant of the domain:
//! - catalog identity uniqueness (one `Food` per name)
//! - per-date aggregation of portions and ratings
//! - goal validity bounds
//! - the execute-then-persist command pipeline
//!
//! ## Architectural Constraints
//!
//! - No async, no network, no global logger (logging goes through [`LogSink`])
//! - Never panics on user input; every failure is a [`NomError`]
//! - Text tokenizing and terminal rendering live in the binary

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod command;
pub mod daily_log;
pub mod filter;
pub mod food;
pub mod formats;
pub mod goal;
pub mod model;
pub mod pipeline;
pub mod primitives;
pub mod record;
pub mod sample;
pub mod sink;
pub mod storage;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Name, NomError, Nutrient, Portion, Rating, StoreKind, Tag};

// =============================================================================
// RE-EXPORTS: Domain
// =============================================================================

pub use catalog::FoodCatalog;
pub use daily_log::{DailyFoodLog, FoodEntry, Serving};
pub use filter::{FoodAttribute, FoodFilter, FoodPredicate, MatchMode};
pub use food::Food;
pub use goal::DailyGoal;
pub use model::{Model, ModelEvent, ModelListener, ModelOps};
pub use record::ConsumptionRecord;

// =============================================================================
// RE-EXPORTS: Execution
// =============================================================================

pub use command::{Command, CommandResult, FoodUpdate, HELP_MESSAGE};
pub use pipeline::{CommandPipeline, PipelineState};
pub use sink::{LogLevel, LogRecord, LogSink, MemorySink, NullSink};

// =============================================================================
// RE-EXPORTS: Persistence
// =============================================================================

pub use formats::{
    catalog_from_json, catalog_to_json, goal_from_json, goal_to_json, record_from_json,
    record_to_json,
};
pub use sample::sample_catalog;
pub use storage::{JsonStorage, MemoryStorage, Storage, bootstrap};
