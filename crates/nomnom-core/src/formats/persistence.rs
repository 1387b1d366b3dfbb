//! # Persistence Format
//!
//! JSON documents for the three stores.
//!
//! Per the storage contract, only the encoding lives here; file I/O is in
//! `storage`. Every document carries a `version` field and is validated
//! before it becomes a domain value:
//! - payload size is checked before parsing
//! - the version must match `FORMAT_VERSION`
//! - catalog identities and log dates must be unique
//! - every entry has at least one serving, all of the same food
//! - portions must be positive, goals valid or unset
//!
//! Any violation is reported as `NomError::DataConversion`.

use crate::primitives::{FORMAT_VERSION, MAX_STORE_PAYLOAD_SIZE, UNSET_GOAL};
use crate::{
    ConsumptionRecord, DailyFoodLog, DailyGoal, Food, FoodCatalog, FoodEntry, NomError, Rating,
    Serving,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

// =============================================================================
// DOCUMENTS
// =============================================================================

/// On-disk shape of the food catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub version: u32,
    pub foods: Vec<Food>,
}

/// On-disk shape of one consumption event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServingDocument {
    pub food: Food,
    pub portion: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

/// On-disk shape of one food's servings on a day, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDocument {
    pub servings: Vec<ServingDocument>,
}

/// On-disk shape of one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayDocument {
    pub date: NaiveDate,
    pub entries: Vec<EntryDocument>,
}

/// On-disk shape of the consumption record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDocument {
    pub version: u32,
    pub days: Vec<DayDocument>,
}

/// On-disk shape of the goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalDocument {
    pub version: u32,
    pub calories: i32,
}

impl From<&FoodCatalog> for CatalogDocument {
    fn from(catalog: &FoodCatalog) -> Self {
        Self {
            version: FORMAT_VERSION,
            foods: catalog.as_slice().to_vec(),
        }
    }
}

impl TryFrom<CatalogDocument> for FoodCatalog {
    type Error = NomError;

    fn try_from(doc: CatalogDocument) -> Result<Self, Self::Error> {
        check_version(doc.version)?;
        FoodCatalog::from_foods(doc.foods).map_err(malformed)
    }
}

impl From<&ConsumptionRecord> for RecordDocument {
    fn from(record: &ConsumptionRecord) -> Self {
        Self {
            version: FORMAT_VERSION,
            days: record
                .iter()
                .map(|log| DayDocument {
                    date: log.date(),
                    entries: log
                        .entries()
                        .iter()
                        .map(|e| EntryDocument {
                            servings: e
                                .servings()
                                .map(|s| ServingDocument {
                                    food: s.food().clone(),
                                    portion: s.portion(),
                                    rating: s.rating(),
                                })
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl TryFrom<RecordDocument> for ConsumptionRecord {
    type Error = NomError;

    fn try_from(doc: RecordDocument) -> Result<Self, Self::Error> {
        check_version(doc.version)?;
        let mut logs = Vec::with_capacity(doc.days.len());
        for day in doc.days {
            let entries = day
                .entries
                .into_iter()
                .map(|e| {
                    let servings = e
                        .servings
                        .into_iter()
                        .map(|s| Serving::new(s.food, s.portion, s.rating))
                        .collect::<Result<Vec<_>, _>>()?;
                    FoodEntry::from_servings(servings)
                })
                .collect::<Result<Vec<_>, NomError>>()
                .map_err(malformed)?;
            logs.push(DailyFoodLog::from_entries(day.date, entries).map_err(malformed)?);
        }
        ConsumptionRecord::from_logs(logs).map_err(malformed)
    }
}

impl From<&DailyGoal> for GoalDocument {
    fn from(goal: &DailyGoal) -> Self {
        Self {
            version: FORMAT_VERSION,
            calories: goal.get(),
        }
    }
}

impl TryFrom<GoalDocument> for DailyGoal {
    type Error = NomError;

    fn try_from(doc: GoalDocument) -> Result<Self, Self::Error> {
        check_version(doc.version)?;
        if doc.calories == UNSET_GOAL {
            return Ok(DailyGoal::unset());
        }
        DailyGoal::new(doc.calories).map_err(malformed)
    }
}

// =============================================================================
// ENCODE / DECODE
// =============================================================================

/// Serialize the catalog to pretty JSON.
pub fn catalog_to_json(catalog: &FoodCatalog) -> Result<String, NomError> {
    encode(&CatalogDocument::from(catalog))
}

/// Deserialize and validate a catalog.
pub fn catalog_from_json(text: &str) -> Result<FoodCatalog, NomError> {
    FoodCatalog::try_from(decode::<CatalogDocument>(text)?)
}

/// Serialize the consumption record to pretty JSON.
pub fn record_to_json(record: &ConsumptionRecord) -> Result<String, NomError> {
    encode(&RecordDocument::from(record))
}

/// Deserialize and validate a consumption record.
pub fn record_from_json(text: &str) -> Result<ConsumptionRecord, NomError> {
    ConsumptionRecord::try_from(decode::<RecordDocument>(text)?)
}

/// Serialize the goal to pretty JSON.
pub fn goal_to_json(goal: &DailyGoal) -> Result<String, NomError> {
    encode(&GoalDocument::from(goal))
}

/// Deserialize and validate a goal.
pub fn goal_from_json(text: &str) -> Result<DailyGoal, NomError> {
    DailyGoal::try_from(decode::<GoalDocument>(text)?)
}

fn encode<T: Serialize>(doc: &T) -> Result<String, NomError> {
    serde_json::to_string_pretty(doc).map_err(|e| NomError::DataConversion(e.to_string()))
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, NomError> {
    // Size is validated BEFORE parsing.
    if text.len() > MAX_STORE_PAYLOAD_SIZE {
        return Err(NomError::DataConversion(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            text.len(),
            MAX_STORE_PAYLOAD_SIZE
        )));
    }
    serde_json::from_str(text).map_err(|e| NomError::DataConversion(e.to_string()))
}

fn check_version(version: u32) -> Result<(), NomError> {
    if version != FORMAT_VERSION {
        return Err(NomError::DataConversion(format!(
            "Unsupported version: {} (expected {})",
            version, FORMAT_VERSION
        )));
    }
    Ok(())
}

fn malformed(err: NomError) -> NomError {
    match err {
        NomError::DataConversion(_) => err,
        other => NomError::DataConversion(other.to_string()),
    }
}

// =============================================================================
// TESTS
// =============================================================================
