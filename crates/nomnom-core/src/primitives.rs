//! # Primitives
//!
//! Hardcoded limits and constants for the nomnom CORE.
//!
//! These values are compiled into the binary and are immutable at runtime.
//! Every validator in the crate reads its bounds from here.

// =============================================================================
// CALORIE GOAL
// =============================================================================

/// Smallest goal the tracker accepts.
pub const MINIMUM_ACCEPTABLE_CALORIES: i32 = 1;

/// Goals below this are accepted but flagged as unhealthy.
///
/// Advisory only: nothing is ever rejected on this bound.
pub const MINIMUM_HEALTHY_CALORIES: i32 = 1200;

/// Largest goal the tracker accepts.
pub const MAXIMUM_ACCEPTABLE_CALORIES: i32 = 15000;

/// Reserved value meaning "no goal has been set".
///
/// Lies outside the acceptable range on purpose, so an unset goal can never
/// pass validation.
pub const UNSET_GOAL: i32 = -1;

// =============================================================================
// FOOD FIELDS
// =============================================================================

/// Maximum length of a food name, after whitespace normalization.
pub const MAX_NAME_LENGTH: usize = 50;

/// Maximum number of digits in a nutrient value.
///
/// Keeps every nutrient comfortably inside `u32` when parsed.
pub const MAX_NUTRIENT_DIGITS: usize = 6;

/// Maximum length of a single tag.
pub const MAX_TAG_LENGTH: usize = 20;

// =============================================================================
// CONSUMPTION
// =============================================================================

/// Smallest rating a consumption event may carry.
pub const MIN_RATING: u8 = 1;

/// Largest rating a consumption event may carry.
pub const MAX_RATING: u8 = 10;

/// Largest portion accepted in a single consume/unconsume call.
pub const MAX_PORTION: f64 = 10_000.0;

/// Number of days returned by a past-week lookup.
pub const WEEK_LENGTH: usize = 7;

/// Tolerance used when comparing cumulative portions against zero.
pub const PORTION_EPSILON: f64 = 1e-9;

// =============================================================================
// PERSISTENCE
// =============================================================================

/// Current version stamped into every persisted document.
///
/// Increment this when making breaking changes to the store format.
pub const FORMAT_VERSION: u32 = 1;

/// Maximum store file size accepted for decoding (50 MB).
pub const MAX_STORE_PAYLOAD_SIZE: usize = 50 * 1024 * 1024;

/// Default file name of the food catalog store.
pub const DEFAULT_CATALOG_FILE: &str = "foodlist.json";

/// Default file name of the consumption record store.
pub const DEFAULT_RECORD_FILE: &str = "record.json";

/// Default file name of the goal store.
pub const DEFAULT_GOAL_FILE: &str = "goal.json";
