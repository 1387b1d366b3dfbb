//! # Consumption Record
//!
//! The date-indexed journal of daily logs.
//!
//! Logs are created lazily on first consumption and dropped again once they
//! become empty, so the map only ever holds dates with something eaten.
//! Lookups for other dates yield an empty log, never an error.

use crate::primitives::WEEK_LENGTH;
use crate::{DailyFoodLog, Food, NomError, Rating};
use chrono::{Days, NaiveDate};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Date-indexed collection of every `DailyFoodLog`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsumptionRecord {
    logs: BTreeMap<NaiveDate, DailyFoodLog>,
}

impl ConsumptionRecord {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a record from stored logs.
    ///
    /// Empty logs are skipped; a date appearing twice is rejected.
    pub fn from_logs(logs: Vec<DailyFoodLog>) -> Result<Self, NomError> {
        let mut record = Self::new();
        for log in logs {
            record.insert_log(log)?;
        }
        Ok(record)
    }

    /// Insert a whole log. Fails if the date already has one.
    pub fn insert_log(&mut self, log: DailyFoodLog) -> Result<(), NomError> {
        if log.is_empty() {
            return Ok(());
        }
        if self.logs.contains_key(&log.date()) {
            return Err(NomError::InvalidArgument(format!(
                "A food log for {} already exists",
                log.date()
            )));
        }
        self.logs.insert(log.date(), log);
        Ok(())
    }

    /// The log for `date`, or an empty one if nothing was eaten.
    #[must_use]
    pub fn log_for(&self, date: NaiveDate) -> Cow<'_, DailyFoodLog> {
        match self.logs.get(&date) {
            Some(log) => Cow::Borrowed(log),
            None => Cow::Owned(DailyFoodLog::new(date)),
        }
    }

    /// Record `portion` of `food` on `date`.
    pub fn consume(
        &mut self,
        date: NaiveDate,
        food: &Food,
        portion: f64,
        rating: Option<Rating>,
    ) -> Result<(), NomError> {
        let created = !self.logs.contains_key(&date);
        let log = self
            .logs
            .entry(date)
            .or_insert_with(|| DailyFoodLog::new(date));
        if let Err(e) = log.consume(food, portion, rating) {
            if created {
                self.logs.remove(&date);
            }
            return Err(e);
        }
        Ok(())
    }

    /// Withdraw `portion` of `food` on `date`.
    pub fn unconsume(
        &mut self,
        date: NaiveDate,
        food: &Food,
        portion: f64,
    ) -> Result<(), NomError> {
        let log = self.logs.get_mut(&date).ok_or_else(|| NomError::NotConsumed {
            food: food.name().to_string(),
            date,
        })?;
        log.unconsume(food, portion)?;
        if log.is_empty() {
            self.logs.remove(&date);
        }
        Ok(())
    }

    /// Mean rating of `food` on `date`.
    pub fn get_rating(&self, date: NaiveDate, food: &Food) -> Result<f64, NomError> {
        self.log_for(date).get_rating(food)
    }

    /// Calories consumed on `date`.
    #[must_use]
    pub fn total_calories_consumed(&self, date: NaiveDate) -> f64 {
        self.logs
            .get(&date)
            .map(DailyFoodLog::total_calories)
            .unwrap_or(0.0)
    }

    /// The seven logs ending at `reference_date`, oldest first.
    ///
    /// Index 6 is `reference_date` itself; missing days are empty logs.
    #[must_use]
    pub fn past_week_logs(&self, reference_date: NaiveDate) -> Vec<Cow<'_, DailyFoodLog>> {
        (0..WEEK_LENGTH as u64)
            .rev()
            .map(|offset| {
                let date = reference_date
                    .checked_sub_days(Days::new(offset))
                    .unwrap_or(NaiveDate::MIN);
                self.log_for(date)
            })
            .collect()
    }

    /// Dates that have at least one entry, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.logs.keys().copied()
    }

    /// Every stored log, ascending by date.
    pub fn iter(&self) -> impl Iterator<Item = &DailyFoodLog> {
        self.logs.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.logs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn clear(&mut self) {
        self.logs.clear();
    }
}

// =============================================================================
// TESTS
// =============================================================================
