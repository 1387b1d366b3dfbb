//! # Food
//!
//! The immutable nutrition record at the center of the catalog.
//!
//! A `Food` has two notions of equality:
//! - identity equality (`is_same_food`): name only, used for catalog uniqueness
//! - full equality (`PartialEq`): every field, used for change detection

use crate::{Name, Nutrient, Tag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A food definition. Replaced, never mutated, on edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    name: Name,
    calorie: Nutrient,
    protein: Nutrient,
    carbohydrate: Nutrient,
    fat: Nutrient,
    #[serde(default)]
    tags: BTreeSet<Tag>,
}

impl Food {
    /// Create a food from already-validated fields.
    #[must_use]
    pub fn new(
        name: Name,
        calorie: Nutrient,
        protein: Nutrient,
        carbohydrate: Nutrient,
        fat: Nutrient,
        tags: BTreeSet<Tag>,
    ) -> Self {
        Self {
            name,
            calorie,
            protein,
            carbohydrate,
            fat,
            tags,
        }
    }

    /// Build a food straight from raw strings, validating every field.
    pub fn parse(
        name: &str,
        calorie: &str,
        protein: &str,
        carbohydrate: &str,
        fat: &str,
        tags: &[&str],
    ) -> Result<Self, crate::NomError> {
        Ok(Self::new(
            Name::parse(name)?,
            Nutrient::parse(calorie)?,
            Nutrient::parse(protein)?,
            Nutrient::parse(carbohydrate)?,
            Nutrient::parse(fat)?,
            tags.iter()
                .map(|t| Tag::parse(t))
                .collect::<Result<_, _>>()?,
        ))
    }

    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[must_use]
    pub fn calorie(&self) -> &Nutrient {
        &self.calorie
    }

    #[must_use]
    pub fn protein(&self) -> &Nutrient {
        &self.protein
    }

    #[must_use]
    pub fn carbohydrate(&self) -> &Nutrient {
        &self.carbohydrate
    }

    #[must_use]
    pub fn fat(&self) -> &Nutrient {
        &self.fat
    }

    #[must_use]
    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    /// Identity equality: two foods are the same food iff their names match.
    #[must_use]
    pub fn is_same_food(&self, other: &Food) -> bool {
        self.name == other.name
    }

    /// Calories for the given number of portions.
    #[must_use]
    pub fn calories_for(&self, portion: f64) -> f64 {
        f64::from(self.calorie.amount()) * portion
    }
}

impl fmt::Display for Food {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Calories: {} Protein: {} Carbohydrate: {} Fat: {}",
            self.name, self.calorie, self.protein, self.carbohydrate, self.fat
        )?;
        if !self.tags.is_empty() {
            f.write_str(" Tags: ")?;
            for tag in &self.tags {
                write!(f, "{}", tag)?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
