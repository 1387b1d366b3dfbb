//! # Food Catalog
//!
//! The insertion-ordered, identity-unique collection of known foods.
//!
//! Invariant: no two members share a name. Every mutating operation checks
//! identity before touching the backing vector, so a failed call leaves the
//! catalog exactly as it was.

use crate::{Food, Name, NomError};

/// The deduplicated collection of all known Food definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoodCatalog {
    foods: Vec<Food>,
}

impl FoodCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list, rejecting duplicate identities.
    pub fn from_foods(foods: Vec<Food>) -> Result<Self, NomError> {
        let mut catalog = Self::new();
        for food in foods {
            catalog.add(food)?;
        }
        Ok(catalog)
    }

    /// Identity match against existing members.
    #[must_use]
    pub fn contains(&self, food: &Food) -> bool {
        self.position(food).is_some()
    }

    /// Append a food. Fails if a food with the same name is present.
    pub fn add(&mut self, food: Food) -> Result<(), NomError> {
        if self.contains(&food) {
            return Err(NomError::DuplicateFood(food.name().to_string()));
        }
        self.foods.push(food);
        Ok(())
    }

    /// Swap `target` for `replacement` in place.
    ///
    /// Renaming is allowed as long as the new name is not taken by a
    /// different member.
    pub fn replace(&mut self, target: &Food, replacement: Food) -> Result<(), NomError> {
        let index = self
            .position(target)
            .ok_or_else(|| NomError::FoodNotFound(target.name().to_string()))?;

        if !target.is_same_food(&replacement) && self.contains(&replacement) {
            return Err(NomError::DuplicateFood(replacement.name().to_string()));
        }

        self.foods[index] = replacement;
        Ok(())
    }

    /// Remove the member matching `target`'s identity and return it.
    pub fn remove(&mut self, target: &Food) -> Result<Food, NomError> {
        let index = self
            .position(target)
            .ok_or_else(|| NomError::FoodNotFound(target.name().to_string()))?;
        Ok(self.foods.remove(index))
    }

    /// The stored member with `lookup`'s identity.
    pub fn get_existing(&self, lookup: &Food) -> Result<&Food, NomError> {
        self.get_by_name(lookup.name())
            .ok_or_else(|| NomError::FoodNotFound(lookup.name().to_string()))
    }

    /// Lookup by name.
    #[must_use]
    pub fn get_by_name(&self, name: &Name) -> Option<&Food> {
        self.foods.iter().find(|f| f.name() == name)
    }

    /// Lookup by zero-based position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Food> {
        self.foods.get(index)
    }

    /// Lazy, order-preserving view of the members accepted by `predicate`.
    ///
    /// Nothing is cached: each call walks the current contents again.
    pub fn view<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a Food> + 'a
    where
        P: Fn(&Food) -> bool + 'a,
    {
        self.foods.iter().filter(move |f| predicate(*f))
    }

    /// Iterate over every member in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Food> {
        self.foods.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.foods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    /// Remove every member.
    pub fn clear(&mut self) {
        self.foods.clear();
    }

    /// Members as a slice, for serialization.
    #[must_use]
    pub fn as_slice(&self) -> &[Food] {
        &self.foods
    }

    fn position(&self, food: &Food) -> Option<usize> {
        self.foods.iter().position(|f| f.is_same_food(food))
    }
}

impl<'a> IntoIterator for &'a FoodCatalog {
    type Item = &'a Food;
    type IntoIter = std::slice::Iter<'a, Food>;

    fn into_iter(self) -> Self::IntoIter {
        self.foods.iter()
    }
}

// =============================================================================
// TESTS
// =============================================================================
