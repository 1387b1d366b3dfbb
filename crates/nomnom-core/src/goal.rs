//! # Daily Goal
//!
//! The single calorie target and its validity rules.
//!
//! - Accepted range: `[MINIMUM_ACCEPTABLE_CALORIES, MAXIMUM_ACCEPTABLE_CALORIES]`
//! - Healthy range (advisory only): `[MINIMUM_HEALTHY_CALORIES, MAXIMUM_ACCEPTABLE_CALORIES]`
//! - Unset: `UNSET_GOAL`, which is outside the accepted range

use crate::primitives::{
    MAXIMUM_ACCEPTABLE_CALORIES, MINIMUM_ACCEPTABLE_CALORIES, MINIMUM_HEALTHY_CALORIES,
    UNSET_GOAL,
};
use crate::{ConsumptionRecord, NomError};
use chrono::NaiveDate;

/// The caloric target tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyGoal {
    calories: i32,
}

impl Default for DailyGoal {
    fn default() -> Self {
        Self::unset()
    }
}

impl DailyGoal {
    /// A tracker with no goal set.
    #[must_use]
    pub const fn unset() -> Self {
        Self {
            calories: UNSET_GOAL,
        }
    }

    /// A tracker holding `calories`, validated.
    pub fn new(calories: i32) -> Result<Self, NomError> {
        let mut goal = Self::unset();
        goal.set(calories)?;
        Ok(goal)
    }

    /// Whether `value` lies in the accepted range.
    #[must_use]
    pub const fn is_valid_goal(value: i32) -> bool {
        value >= MINIMUM_ACCEPTABLE_CALORIES && value <= MAXIMUM_ACCEPTABLE_CALORIES
    }

    /// Whether `value` lies in the healthy range. Advisory only.
    #[must_use]
    pub const fn is_healthy(value: i32) -> bool {
        value >= MINIMUM_HEALTHY_CALORIES && value <= MAXIMUM_ACCEPTABLE_CALORIES
    }

    /// Replace the goal. On rejection the previous value is kept.
    pub fn set(&mut self, value: i32) -> Result<(), NomError> {
        if !Self::is_valid_goal(value) {
            return Err(NomError::InvalidArgument(format!(
                "Daily goal should be between {} and {} calories, got {}",
                MINIMUM_ACCEPTABLE_CALORIES, MAXIMUM_ACCEPTABLE_CALORIES, value
            )));
        }
        self.calories = value;
        Ok(())
    }

    /// The raw stored value; `UNSET_GOAL` if never set.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.calories
    }

    #[must_use]
    pub const fn is_set(&self) -> bool {
        Self::is_valid_goal(self.calories)
    }

    /// `goal − calories consumed on date`.
    pub fn remaining_calories(
        &self,
        record: &ConsumptionRecord,
        date: NaiveDate,
    ) -> Result<f64, NomError> {
        if !self.is_set() {
            return Err(NomError::InvalidState(
                "No daily goal has been set yet. Use `goal VALUE` first".to_string(),
            ));
        }
        Ok(f64::from(self.calories) - record.total_calories_consumed(date))
    }
}

// =============================================================================
// TESTS
// =============================================================================
