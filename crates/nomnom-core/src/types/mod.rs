//! # Core Type Definitions
//!
//! This module contains the validated value types and the error type for the
//! nomnom CORE:
//! - Food field values (`Name`, `Nutrient`, `Tag`)
//! - Consumption inputs (`Portion`, `Rating`)
//! - Store identifiers (`StoreKind`)
//! - Error types (`NomError`)
//!
//! ## Validation Guarantees
//!
//! Every value type can only be constructed through a validating constructor
//! (`parse` / `new`). Deserialization goes through the same constructors, so a
//! malformed store file is rejected instead of producing an invalid value.

use crate::primitives::{
    MAX_NAME_LENGTH, MAX_NUTRIENT_DIGITS, MAX_PORTION, MAX_RATING, MAX_TAG_LENGTH, MIN_RATING,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// FOOD FIELDS
// =============================================================================

/// The name of a food, which is also its identity.
///
/// Alphanumeric words separated by single spaces. Leading/trailing whitespace
/// is trimmed and inner runs of whitespace are collapsed on construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    pub const CONSTRAINTS: &'static str = "Names should only contain alphanumeric characters and spaces, \
         should not be blank, and should be at most 50 characters long";

    /// Validate and normalize a raw name.
    pub fn parse(raw: &str) -> Result<Self, NomError> {
        let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");

        if normalized.is_empty() || normalized.chars().count() > MAX_NAME_LENGTH {
            return Err(NomError::Parse(Self::CONSTRAINTS.to_string()));
        }
        if !normalized
            .chars()
            .all(|c| c.is_alphanumeric() || c == ' ')
        {
            return Err(NomError::Parse(Self::CONSTRAINTS.to_string()));
        }

        Ok(Self(normalized))
    }

    /// Get the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Name {
    type Error = NomError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Name> for String {
    fn from(value: Name) -> Self {
        value.0
    }
}

/// A non-negative integer nutrient amount, kept in its textual form.
///
/// Used for calories, protein, carbohydrate and fat.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nutrient(String);

impl Nutrient {
    pub const CONSTRAINTS: &'static str =
        "Nutrient values should be non-negative whole numbers of at most 6 digits";

    /// Validate a raw nutrient string.
    pub fn parse(raw: &str) -> Result<Self, NomError> {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed.len() > MAX_NUTRIENT_DIGITS
            || !trimmed.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(NomError::Parse(Self::CONSTRAINTS.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the nutrient as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the nutrient.
    ///
    /// Construction guarantees at most six ASCII digits, so this cannot fail;
    /// the fallback only exists to keep the function total.
    #[must_use]
    pub fn amount(&self) -> u32 {
        self.0.parse().unwrap_or(0)
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Nutrient {
    type Error = NomError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Nutrient> for String {
    fn from(value: Nutrient) -> Self {
        value.0
    }
}

/// A short alphanumeric label attached to a food. Stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    pub const CONSTRAINTS: &'static str =
        "Tags should be alphanumeric, without spaces, and at most 20 characters long";

    /// Validate a raw tag.
    pub fn parse(raw: &str) -> Result<Self, NomError> {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed.len() > MAX_TAG_LENGTH
            || !trimmed.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(NomError::Parse(Self::CONSTRAINTS.to_string()));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Get the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

impl TryFrom<String> for Tag {
    type Error = NomError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Tag> for String {
    fn from(value: Tag) -> Self {
        value.0
    }
}

// =============================================================================
// CONSUMPTION INPUTS
// =============================================================================

/// A strictly positive, finite amount of a food.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Portion(f64);

impl Portion {
    pub const CONSTRAINTS: &'static str =
        "Portions should be positive numbers no larger than 10000";

    /// Validate a portion amount.
    pub fn new(amount: f64) -> Result<Self, NomError> {
        if !amount.is_finite() || amount <= 0.0 || amount > MAX_PORTION {
            return Err(NomError::InvalidArgument(Self::CONSTRAINTS.to_string()));
        }
        Ok(Self(amount))
    }

    /// Parse a portion from text.
    pub fn parse(raw: &str) -> Result<Self, NomError> {
        let amount: f64 = raw
            .trim()
            .parse()
            .map_err(|_| NomError::Parse(Self::CONSTRAINTS.to_string()))?;
        Self::new(amount).map_err(|_| NomError::Parse(Self::CONSTRAINTS.to_string()))
    }

    /// Get the raw amount.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Default for Portion {
    fn default() -> Self {
        Self(1.0)
    }
}

impl TryFrom<f64> for Portion {
    type Error = NomError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Portion> for f64 {
    fn from(value: Portion) -> Self {
        value.0
    }
}

/// A rating given to a food at one consumption event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const CONSTRAINTS: &'static str = "Ratings should be whole numbers from 1 to 10";

    /// Validate a rating value.
    pub fn new(value: u8) -> Result<Self, NomError> {
        if !(MIN_RATING..=MAX_RATING).contains(&value) {
            return Err(NomError::InvalidArgument(Self::CONSTRAINTS.to_string()));
        }
        Ok(Self(value))
    }

    /// Parse a rating from text.
    pub fn parse(raw: &str) -> Result<Self, NomError> {
        raw.trim()
            .parse::<u8>()
            .ok()
            .and_then(|v| Self::new(v).ok())
            .ok_or_else(|| NomError::Parse(Self::CONSTRAINTS.to_string()))
    }

    /// Get the raw rating.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = NomError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

// =============================================================================
// STORES
// =============================================================================

/// Identifies one of the three independently persisted aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StoreKind {
    Catalog,
    Record,
    Goal,
}

impl StoreKind {
    /// Fixed save order used by the pipeline.
    pub const SAVE_ORDER: [Self; 3] = [Self::Catalog, Self::Record, Self::Goal];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Record => "record",
            Self::Goal => "goal",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the nomnom system.
///
/// - No silent failures
/// - Use `Result<T, NomError>` for fallible operations
/// - The CORE should never panic; all errors must be recoverable
#[derive(Debug, Error)]
pub enum NomError {
    /// Malformed command text or field value. Raised before any mutation.
    #[error("{0}")]
    Parse(String),

    /// A food with the same name is already in the catalog.
    #[error("This food already exists in the food list: {0}")]
    DuplicateFood(String),

    /// No food with this name is in the catalog.
    #[error("This food does not exist in the food list: {0}")]
    FoodNotFound(String),

    /// The food has no consumption entry on the given date.
    #[error("{food} was not eaten on {date}")]
    NotConsumed { food: String, date: NaiveDate },

    /// The food was eaten on the given date but never rated.
    #[error("{food} has no rating on {date}")]
    NotRated { food: String, date: NaiveDate },

    /// A displayed index does not refer to a food in the current view.
    #[error("The food index provided is invalid: {0}")]
    IndexOutOfRange(usize),

    /// A value is outside its valid domain (goal, portion, rating, filter value).
    #[error("{0}")]
    InvalidArgument(String),

    /// The requested operation is undefined in the current state.
    #[error("{0}")]
    InvalidState(String),

    /// A store write failed after the in-memory mutation succeeded.
    #[error("Could not save data to file: {reason}")]
    Persistence { store: StoreKind, reason: String },

    /// A store exists but its content could not be decoded.
    #[error("Data conversion error: {0}")]
    DataConversion(String),

    /// An I/O error occurred while reading a store.
    #[error("I/O error: {0}")]
    Io(String),
}

impl NomError {
    /// True for failures of the backing files rather than of the command.
    #[must_use]
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Self::Persistence { .. } | Self::Io(_))
    }
}

// =============================================================================
// TESTS
// =============================================================================
