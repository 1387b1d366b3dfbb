//! # Sample Data
//!
//! The starter catalog used when no catalog store exists yet.

use crate::{Food, FoodCatalog, NomError};

/// `(name, calorie, protein, carbohydrate, fat, tags)`
const SAMPLE_FOODS: &[(&str, &str, &str, &str, &str, &[&str])] = &[
    ("Apple", "95", "0", "25", "0", &["fruit"]),
    ("Banana", "105", "1", "27", "0", &["fruit"]),
    ("Boiled Egg", "78", "6", "1", "5", &["protein", "breakfast"]),
    ("Chicken Rice", "600", "30", "75", "18", &["lunch"]),
    ("Greek Yogurt", "100", "17", "6", "1", &["breakfast", "snack"]),
    ("Oatmeal", "150", "5", "27", "3", &["breakfast"]),
];

/// Build the starter catalog.
pub fn sample_catalog() -> Result<FoodCatalog, NomError> {
    let foods = SAMPLE_FOODS
        .iter()
        .map(|(name, cal, protein, carb, fat, tags)| {
            Food::parse(name, cal, protein, carb, fat, tags)
        })
        .collect::<Result<Vec<_>, _>>()?;
    FoodCatalog::from_foods(foods)
}
