//! # Daily Food Log
//!
//! One calendar date's consumption: per food identity, the stack of servings
//! logged that day.
//!
//! A serving remembers the `Food` value, portion and optional rating of one
//! consumption event. Withdrawals take from the newest serving first, so a
//! consume followed by an unconsume of the same portion restores the entry
//! exactly: portion, ratings and calories.
//!
//! Entries keep first-consumption order. An entry disappears as soon as its
//! cumulative portion drops to zero or below.

use crate::primitives::PORTION_EPSILON;
use crate::{Food, Name, NomError, Portion, Rating};
use chrono::NaiveDate;

// =============================================================================
// SERVING
// =============================================================================

/// One consumption event.
#[derive(Debug, Clone, PartialEq)]
pub struct Serving {
    food: Food,
    portion: f64,
    rating: Option<Rating>,
}

impl Serving {
    /// Build a serving, requiring a positive portion.
    pub fn new(food: Food, portion: f64, rating: Option<Rating>) -> Result<Self, NomError> {
        if !portion.is_finite() || portion <= 0.0 {
            return Err(NomError::InvalidArgument(format!(
                "Portion of {} must be positive, got {}",
                food.name(),
                portion
            )));
        }
        Ok(Self {
            food,
            portion,
            rating,
        })
    }

    #[must_use]
    pub fn food(&self) -> &Food {
        &self.food
    }

    #[must_use]
    pub fn portion(&self) -> f64 {
        self.portion
    }

    #[must_use]
    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    /// Calories at the food's value when it was eaten.
    #[must_use]
    pub fn calories(&self) -> f64 {
        self.food.calories_for(self.portion)
    }
}

// =============================================================================
// ENTRY
// =============================================================================

/// Consumption of one food on one date.
///
/// Never empty: `latest` always holds the newest serving.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodEntry {
    earlier: Vec<Serving>,
    latest: Serving,
}

impl FoodEntry {
    /// Rebuild an entry from its servings, oldest first.
    pub fn from_servings(servings: Vec<Serving>) -> Result<Self, NomError> {
        let mut servings = servings.into_iter();
        let first = servings.next().ok_or_else(|| {
            NomError::InvalidArgument("A food entry needs at least one serving".to_string())
        })?;
        let mut entry = Self {
            earlier: Vec::new(),
            latest: first,
        };
        for serving in servings {
            if !serving.food.is_same_food(&entry.latest.food) {
                return Err(NomError::InvalidArgument(format!(
                    "Serving of {} filed under {}",
                    serving.food.name(),
                    entry.latest.food.name()
                )));
            }
            entry.push(serving);
        }
        Ok(entry)
    }

    /// The food as of the newest serving.
    #[must_use]
    pub fn food(&self) -> &Food {
        &self.latest.food
    }

    /// Cumulative portion.
    #[must_use]
    pub fn portion(&self) -> f64 {
        self.servings().map(Serving::portion).sum()
    }

    /// Servings, oldest first.
    pub fn servings(&self) -> impl Iterator<Item = &Serving> {
        self.earlier.iter().chain(std::iter::once(&self.latest))
    }

    /// Ratings given, oldest first. Unrated servings are skipped.
    #[must_use]
    pub fn ratings(&self) -> Vec<Rating> {
        self.servings().filter_map(Serving::rating).collect()
    }

    /// Mean rating, if the food was rated at least once.
    #[must_use]
    pub fn average_rating(&self) -> Option<f64> {
        let ratings = self.ratings();
        if ratings.is_empty() {
            return None;
        }
        let sum: u32 = ratings.iter().map(|r| u32::from(r.value())).sum();
        Some(f64::from(sum) / ratings.len() as f64)
    }

    #[must_use]
    pub fn calories(&self) -> f64 {
        self.servings().map(Serving::calories).sum()
    }

    fn push(&mut self, serving: Serving) {
        let previous = std::mem::replace(&mut self.latest, serving);
        self.earlier.push(previous);
    }

    /// Take `portion` away, newest servings first. Returns `false` once
    /// nothing is left.
    fn withdraw(&mut self, mut portion: f64) -> bool {
        loop {
            if self.latest.portion - portion > PORTION_EPSILON {
                self.latest.portion -= portion;
                return true;
            }
            portion -= self.latest.portion;
            match self.earlier.pop() {
                Some(previous) => self.latest = previous,
                None => return false,
            }
            if portion <= PORTION_EPSILON {
                return true;
            }
        }
    }
}

// =============================================================================
// DAILY LOG
// =============================================================================

/// Aggregated consumption for a single date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyFoodLog {
    date: NaiveDate,
    entries: Vec<FoodEntry>,
}

impl DailyFoodLog {
    /// An empty log for `date`.
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            entries: Vec::new(),
        }
    }

    /// Rebuild a log from stored entries, rejecting repeated identities.
    pub fn from_entries(date: NaiveDate, entries: Vec<FoodEntry>) -> Result<Self, NomError> {
        let mut log = Self::new(date);
        for entry in entries {
            if log.position(entry.food()).is_some() {
                return Err(NomError::DuplicateFood(entry.food().name().to_string()));
            }
            log.entries.push(entry);
        }
        Ok(log)
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn entries(&self) -> &[FoodEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `food` has an entry on this date.
    #[must_use]
    pub fn contains(&self, food: &Food) -> bool {
        self.position(food).is_some()
    }

    /// Add a serving of `portion` of `food`, optionally rated.
    pub fn consume(
        &mut self,
        food: &Food,
        portion: f64,
        rating: Option<Rating>,
    ) -> Result<(), NomError> {
        let portion = Portion::new(portion)?.value();
        let serving = Serving::new(food.clone(), portion, rating)?;

        match self.position(food) {
            Some(index) => self.entries[index].push(serving),
            None => self.entries.push(FoodEntry {
                earlier: Vec::new(),
                latest: serving,
            }),
        }
        Ok(())
    }

    /// Subtract `portion` of `food`, newest servings first.
    ///
    /// Fully withdrawn servings leave with their ratings. If the cumulative
    /// amount reaches zero the entry is dropped.
    pub fn unconsume(&mut self, food: &Food, portion: f64) -> Result<(), NomError> {
        let portion = Portion::new(portion)?.value();
        let index = self.position(food).ok_or_else(|| NomError::NotConsumed {
            food: food.name().to_string(),
            date: self.date,
        })?;

        if !self.entries[index].withdraw(portion) {
            self.entries.remove(index);
        }
        Ok(())
    }

    /// Cumulative portion of `food`, zero if not eaten.
    #[must_use]
    pub fn portion(&self, food: &Food) -> f64 {
        self.entry(food).map(FoodEntry::portion).unwrap_or(0.0)
    }

    /// Ratings given to `food` on this date, oldest first.
    #[must_use]
    pub fn ratings(&self, food: &Food) -> Vec<Rating> {
        self.entry(food).map(FoodEntry::ratings).unwrap_or_default()
    }

    /// Mean rating of `food` on this date.
    pub fn get_rating(&self, food: &Food) -> Result<f64, NomError> {
        self.entry(food)
            .and_then(FoodEntry::average_rating)
            .ok_or_else(|| NomError::NotRated {
                food: food.name().to_string(),
                date: self.date,
            })
    }

    /// Sum of `portion × calorie` over every serving.
    #[must_use]
    pub fn total_calories(&self) -> f64 {
        self.entries.iter().map(FoodEntry::calories).sum()
    }

    /// The entry for `food`, if any.
    #[must_use]
    pub fn entry(&self, food: &Food) -> Option<&FoodEntry> {
        self.position(food).map(|i| &self.entries[i])
    }

    /// The entry whose food is called `name`, if any.
    #[must_use]
    pub fn entry_by_name(&self, name: &Name) -> Option<&FoodEntry> {
        self.entries.iter().find(|e| e.food().name() == name)
    }

    fn position(&self, food: &Food) -> Option<usize> {
        self.entries.iter().position(|e| e.food().is_same_food(food))
    }
}

// =============================================================================
// TESTS
// =============================================================================
