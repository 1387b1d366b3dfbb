//! # Commands
//!
//! Bound, executable commands.
//!
//! A `Command` is produced by a parser with every field already validated.
//! Executing it performs at most one model mutation through [`ModelOps`];
//! read-only commands (`Summary`, `Week`, `Help`, `Exit`) perform none.

use crate::primitives::MINIMUM_HEALTHY_CALORIES;
use crate::{
    DailyGoal, Food, FoodFilter, FoodPredicate, ModelOps, Name, NomError, Nutrient, Portion,
    Rating, Tag,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Usage text shown by `help`.
pub const HELP_MESSAGE: &str = "\
Commands:
  update name/NAME [cal/CALORIES] [protein/PROTEIN] [carbohydrate/CARBOHYDRATE] [fat/FAT] [tag/TAG]...
  delete INDEX
  nom name/NAME [date/YYYY-MM-DD] [portion/PORTION] [rating/1-10]
  unnom name/NAME [date/YYYY-MM-DD] [portion/PORTION]
  list
  find [name/KEYWORDS] [tag/TAG]... [cal/N] [protein/N] [carbohydrate/N] [fat/N]
  goal CALORIES
  summary [date/YYYY-MM-DD]
  week [date/YYYY-MM-DD]
  clear
  help
  exit";

// =============================================================================
// RESULT
// =============================================================================

/// Outcome of a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Message to show the user.
    pub feedback: String,
    /// The front end should stop after this command.
    pub exit: bool,
}

impl CommandResult {
    #[must_use]
    pub fn new(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            exit: false,
        }
    }

    #[must_use]
    pub fn exit(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            exit: true,
        }
    }
}

// =============================================================================
// UPDATE DESCRIPTOR
// =============================================================================

/// Fields supplied to `update`. Absent fields keep their stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodUpdate {
    pub name: Name,
    pub calorie: Option<Nutrient>,
    pub protein: Option<Nutrient>,
    pub carbohydrate: Option<Nutrient>,
    pub fat: Option<Nutrient>,
    /// `Some` replaces the whole tag set.
    pub tags: Option<BTreeSet<Tag>>,
}

impl FoodUpdate {
    /// A descriptor touching only the name.
    #[must_use]
    pub fn named(name: Name) -> Self {
        Self {
            name,
            calorie: None,
            protein: None,
            carbohydrate: None,
            fat: None,
            tags: None,
        }
    }

    /// Apply the descriptor on top of an existing food.
    #[must_use]
    pub fn apply_to(&self, existing: &Food) -> Food {
        Food::new(
            self.name.clone(),
            self.calorie.clone().unwrap_or_else(|| existing.calorie().clone()),
            self.protein.clone().unwrap_or_else(|| existing.protein().clone()),
            self.carbohydrate
                .clone()
                .unwrap_or_else(|| existing.carbohydrate().clone()),
            self.fat.clone().unwrap_or_else(|| existing.fat().clone()),
            self.tags.clone().unwrap_or_else(|| existing.tags().clone()),
        )
    }

    /// Build a brand-new food. Every nutrient must be present.
    pub fn build_new(&self) -> Result<Food, NomError> {
        match (&self.calorie, &self.protein, &self.carbohydrate, &self.fat) {
            (Some(calorie), Some(protein), Some(carbohydrate), Some(fat)) => Ok(Food::new(
                self.name.clone(),
                calorie.clone(),
                protein.clone(),
                carbohydrate.clone(),
                fat.clone(),
                self.tags.clone().unwrap_or_default(),
            )),
            _ => Err(NomError::InvalidArgument(format!(
                "{} is a new food: cal/, protein/, carbohydrate/ and fat/ are all required",
                self.name
            ))),
        }
    }
}

// =============================================================================
// COMMAND
// =============================================================================

/// A parsed command, ready to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a food, or edit the one with the same name.
    Update(FoodUpdate),
    /// Remove the food at a 1-based index of the current view.
    Delete { index: usize },
    /// Log a consumption event.
    Nom {
        name: Name,
        date: NaiveDate,
        portion: Portion,
        rating: Option<Rating>,
    },
    /// Withdraw part of a logged consumption.
    Unnom {
        name: Name,
        date: NaiveDate,
        portion: Portion,
    },
    /// Show the whole catalog.
    List,
    /// Narrow the catalog view; every predicate must hold.
    Find { predicates: Vec<FoodPredicate> },
    /// Set the daily calorie goal.
    Goal { calories: i32 },
    /// Describe one day's log.
    Summary { date: NaiveDate },
    /// Calorie totals for the week ending on `date`.
    Week { date: NaiveDate },
    /// Empty the catalog.
    Clear,
    Help,
    Exit,
}

impl Command {
    /// The command word, for logs.
    #[must_use]
    pub fn word(&self) -> &'static str {
        match self {
            Self::Update(_) => "update",
            Self::Delete { .. } => "delete",
            Self::Nom { .. } => "nom",
            Self::Unnom { .. } => "unnom",
            Self::List => "list",
            Self::Find { .. } => "find",
            Self::Goal { .. } => "goal",
            Self::Summary { .. } => "summary",
            Self::Week { .. } => "week",
            Self::Clear => "clear",
            Self::Help => "help",
            Self::Exit => "exit",
        }
    }

    /// Run the command against the model.
    pub fn execute(&self, model: &mut dyn ModelOps) -> Result<CommandResult, NomError> {
        match self {
            Self::Update(update) => execute_update(model, update),
            Self::Delete { index } => {
                let target = index
                    .checked_sub(1)
                    .and_then(|i| model.filtered_foods().get(i).map(|f| (*f).clone()))
                    .ok_or(NomError::IndexOutOfRange(*index))?;
                let removed = model.remove_food(&target)?;
                Ok(CommandResult::new(format!("Deleted food: {}", removed)))
            }
            Self::Nom {
                name,
                date,
                portion,
                rating,
            } => {
                let food = model
                    .catalog()
                    .get_by_name(name)
                    .cloned()
                    .ok_or_else(|| NomError::FoodNotFound(name.to_string()))?;
                model.consume(*date, &food, portion.value(), *rating)?;
                let mut feedback = format!(
                    "Nommed {} portion(s) of {} on {}",
                    portion.value(),
                    name,
                    date
                );
                if let Some(rating) = rating {
                    let _ = write!(feedback, " (rated {})", rating.value());
                }
                Ok(CommandResult::new(feedback))
            }
            Self::Unnom {
                name,
                date,
                portion,
            } => {
                let food = model
                    .record()
                    .log_for(*date)
                    .entry_by_name(name)
                    .map(|e| e.food().clone())
                    .ok_or_else(|| NomError::NotConsumed {
                        food: name.to_string(),
                        date: *date,
                    })?;
                model.unconsume(*date, &food, portion.value())?;
                Ok(CommandResult::new(format!(
                    "Removed {} portion(s) of {} from {}",
                    portion.value(),
                    name,
                    date
                )))
            }
            Self::List => {
                model.set_filter(FoodFilter::all());
                Ok(CommandResult::new("Listed all foods"))
            }
            Self::Find { predicates } => {
                if predicates.is_empty() {
                    return Err(NomError::InvalidArgument(
                        "find needs at least one criterion".to_string(),
                    ));
                }
                model.set_filter(FoodFilter::new(predicates.clone()));
                Ok(CommandResult::new(format!(
                    "{} foods listed!",
                    model.filtered_foods().len()
                )))
            }
            Self::Goal { calories } => {
                model.set_goal(*calories)?;
                let mut feedback = format!("Daily goal set to {} calories", calories);
                if !DailyGoal::is_healthy(*calories) {
                    let _ = write!(
                        feedback,
                        ". Note: goals below {} calories are not recommended",
                        MINIMUM_HEALTHY_CALORIES
                    );
                }
                Ok(CommandResult::new(feedback))
            }
            Self::Summary { date } => Ok(CommandResult::new(render_summary(&*model, *date))),
            Self::Week { date } => Ok(CommandResult::new(render_week(&*model, *date))),
            Self::Clear => {
                model.clear_catalog();
                Ok(CommandResult::new("Food list has been cleared!"))
            }
            Self::Help => Ok(CommandResult::new(HELP_MESSAGE)),
            Self::Exit => Ok(CommandResult::exit("Bye! Happy nomming.")),
        }
    }
}

fn execute_update(model: &mut dyn ModelOps, update: &FoodUpdate) -> Result<CommandResult, NomError> {
    let existing = model.catalog().get_by_name(&update.name).cloned();

    match existing {
        Some(existing) => {
            let edited = update.apply_to(&existing);
            if edited == existing {
                return Ok(CommandResult::new(format!(
                    "No changes made to food: {}",
                    existing
                )));
            }
            let feedback = format!("Updated food: {}", edited);
            model.replace_food(&existing, edited)?;
            Ok(CommandResult::new(feedback))
        }
        None => {
            let food = update.build_new()?;
            let feedback = format!("Created new food: {}", food);
            model.add_food(food)?;
            Ok(CommandResult::new(feedback))
        }
    }
}

// =============================================================================
// RENDERING
// =============================================================================

fn render_summary(model: &dyn ModelOps, date: NaiveDate) -> String {
    let log = model.record().log_for(date);
    let mut out = format!("Food log for {}:", date);

    if log.is_empty() {
        out.push_str("\n  Nothing eaten.");
    }
    for (i, entry) in log.entries().iter().enumerate() {
        let _ = write!(
            out,
            "\n  {}. {} x{} = {:.0} cal",
            i + 1,
            entry.food().name(),
            entry.portion(),
            entry.calories()
        );
        if let Some(avg) = entry.average_rating() {
            let _ = write!(out, " (rating {:.1})", avg);
        }
    }

    let _ = write!(out, "\nTotal: {:.0} cal", log.total_calories());
    match model.goal().remaining_calories(model.record(), date) {
        Ok(remaining) => {
            let _ = write!(
                out,
                "\nGoal: {} cal, remaining: {:.0} cal",
                model.goal().get(),
                remaining
            );
        }
        Err(_) => out.push_str("\nNo daily goal set."),
    }
    out
}

fn render_week(model: &dyn ModelOps, date: NaiveDate) -> String {
    let mut out = format!("Calories for the week ending {}:", date);
    for log in model.record().past_week_logs(date) {
        let _ = write!(
            out,
            "\n  {} {:>8.0} cal",
            log.date().format("%a %Y-%m-%d"),
            log.total_calories()
        );
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================
