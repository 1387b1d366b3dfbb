//! # Model
//!
//! Owner of the catalog, the consumption record, the goal and the current
//! catalog filter.
//!
//! Commands never see the `Model` type itself. They receive the narrow
//! [`ModelOps`] capability for the duration of one call, which is the only
//! way state can change. Every successful mutation is announced to the
//! registered listeners as a [`ModelEvent`]; failed mutations are silent.

use crate::{
    ConsumptionRecord, DailyGoal, Food, FoodCatalog, FoodFilter, Name, NomError, Rating,
};
use chrono::NaiveDate;
use std::fmt;

// =============================================================================
// EVENTS
// =============================================================================

/// A change that has just been applied to the model.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
    FoodAdded(Name),
    FoodReplaced { from: Name, to: Name },
    FoodRemoved(Name),
    CatalogCleared,
    ConsumptionChanged(NaiveDate),
    GoalChanged(i32),
    FilterChanged,
}

/// A change listener.
pub type ModelListener = Box<dyn FnMut(&ModelEvent)>;

// =============================================================================
// CAPABILITY
// =============================================================================

/// The mutation surface commands execute against.
pub trait ModelOps {
    fn catalog(&self) -> &FoodCatalog;

    fn record(&self) -> &ConsumptionRecord;

    fn goal(&self) -> &DailyGoal;

    fn filter(&self) -> &FoodFilter;

    /// Foods accepted by the current filter, in catalog order.
    fn filtered_foods(&self) -> Vec<&Food>;

    fn add_food(&mut self, food: Food) -> Result<(), NomError>;

    fn replace_food(&mut self, target: &Food, replacement: Food) -> Result<(), NomError>;

    fn remove_food(&mut self, target: &Food) -> Result<Food, NomError>;

    fn clear_catalog(&mut self);

    fn consume(
        &mut self,
        date: NaiveDate,
        food: &Food,
        portion: f64,
        rating: Option<Rating>,
    ) -> Result<(), NomError>;

    fn unconsume(&mut self, date: NaiveDate, food: &Food, portion: f64)
    -> Result<(), NomError>;

    fn set_goal(&mut self, calories: i32) -> Result<(), NomError>;

    fn set_filter(&mut self, filter: FoodFilter);
}

// =============================================================================
// MODEL
// =============================================================================

/// The in-memory state of the application.
#[derive(Default)]
pub struct Model {
    catalog: FoodCatalog,
    record: ConsumptionRecord,
    goal: DailyGoal,
    filter: FoodFilter,
    listeners: Vec<ModelListener>,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("catalog", &self.catalog)
            .field("record", &self.record)
            .field("goal", &self.goal)
            .field("filter", &self.filter)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Model {
    /// Create an empty model with no goal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a model from loaded aggregates. The filter starts as "all".
    #[must_use]
    pub fn with_state(catalog: FoodCatalog, record: ConsumptionRecord, goal: DailyGoal) -> Self {
        Self {
            catalog,
            record,
            goal,
            filter: FoodFilter::all(),
            listeners: Vec::new(),
        }
    }

    /// Register a change listener.
    pub fn subscribe(&mut self, listener: ModelListener) {
        self.listeners.push(listener);
    }

    fn notify(&mut self, event: ModelEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

impl ModelOps for Model {
    fn catalog(&self) -> &FoodCatalog {
        &self.catalog
    }

    fn record(&self) -> &ConsumptionRecord {
        &self.record
    }

    fn goal(&self) -> &DailyGoal {
        &self.goal
    }

    fn filter(&self) -> &FoodFilter {
        &self.filter
    }

    fn filtered_foods(&self) -> Vec<&Food> {
        self.catalog.view(|f| self.filter.test(f)).collect()
    }

    fn add_food(&mut self, food: Food) -> Result<(), NomError> {
        let name = food.name().clone();
        self.catalog.add(food)?;
        self.notify(ModelEvent::FoodAdded(name));
        Ok(())
    }

    fn replace_food(&mut self, target: &Food, replacement: Food) -> Result<(), NomError> {
        let event = ModelEvent::FoodReplaced {
            from: target.name().clone(),
            to: replacement.name().clone(),
        };
        self.catalog.replace(target, replacement)?;
        self.notify(event);
        Ok(())
    }

    fn remove_food(&mut self, target: &Food) -> Result<Food, NomError> {
        let removed = self.catalog.remove(target)?;
        self.notify(ModelEvent::FoodRemoved(removed.name().clone()));
        Ok(removed)
    }

    fn clear_catalog(&mut self) {
        self.catalog.clear();
        self.notify(ModelEvent::CatalogCleared);
    }

    fn consume(
        &mut self,
        date: NaiveDate,
        food: &Food,
        portion: f64,
        rating: Option<Rating>,
    ) -> Result<(), NomError> {
        self.record.consume(date, food, portion, rating)?;
        self.notify(ModelEvent::ConsumptionChanged(date));
        Ok(())
    }

    fn unconsume(
        &mut self,
        date: NaiveDate,
        food: &Food,
        portion: f64,
    ) -> Result<(), NomError> {
        self.record.unconsume(date, food, portion)?;
        self.notify(ModelEvent::ConsumptionChanged(date));
        Ok(())
    }

    fn set_goal(&mut self, calories: i32) -> Result<(), NomError> {
        self.goal.set(calories)?;
        self.notify(ModelEvent::GoalChanged(calories));
        Ok(())
    }

    fn set_filter(&mut self, filter: FoodFilter) {
        self.filter = filter;
        self.notify(ModelEvent::FilterChanged);
    }
}

// =============================================================================
// TESTS
// =============================================================================
