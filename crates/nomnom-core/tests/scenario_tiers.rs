//! # Scenario Tier Tests (T0-T3)
//!
//! ## Tiers
//! - T0: Catalog and goal invariants
//! - T1: Consumption aggregation
//! - T2: Filtering
//! - T3: Pipeline and persistence

use chrono::NaiveDate;
use nomnom_core::primitives::{MAXIMUM_ACCEPTABLE_CALORIES, MINIMUM_ACCEPTABLE_CALORIES, UNSET_GOAL};
use nomnom_core::{
    Command, CommandPipeline, ConsumptionRecord, DailyGoal, Food, FoodCatalog, FoodPredicate,
    FoodUpdate, JsonStorage, MemorySink, ModelOps, Name, NomError, NullSink, Nutrient, Portion,
    Rating, Storage, StoreKind, bootstrap,
};
use std::sync::Arc;
use tempfile::TempDir;

fn food(name: &str, cal: u32, protein: u32, carb: u32, fat: u32) -> Food {
    Food::parse(
        name,
        &cal.to_string(),
        &protein.to_string(),
        &carb.to_string(),
        &fat.to_string(),
        &[],
    )
    .expect("valid food")
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).expect("valid date")
}

fn rating(r: u8) -> Option<Rating> {
    Some(Rating::new(r).expect("rating"))
}

// =============================================================================
// TIER T0: CATALOG AND GOAL INVARIANTS
// =============================================================================

mod t0_invariants {
    use super::*;

    /// T0.1: Second add of the same identity is rejected, first value kept.
    #[test]
    fn duplicate_add_rejected() {
        let mut catalog = FoodCatalog::new();
        catalog.add(food("Apple", 100, 3, 40, 1)).expect("first add");

        let err = catalog
            .add(food("Apple", 200, 0, 0, 0))
            .expect_err("duplicate");
        assert!(matches!(err, NomError::DuplicateFood(_)));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.as_slice()[0].calorie().amount(), 100);
    }

    /// T0.2: Replace keeps position and rejects collisions.
    #[test]
    fn replace_preserves_position() {
        let mut catalog = FoodCatalog::from_foods(vec![
            food("Apple", 1, 1, 1, 1),
            food("Bagel", 2, 2, 2, 2),
            food("Cheese", 3, 3, 3, 3),
        ])
        .expect("catalog");

        catalog
            .replace(&food("Bagel", 0, 0, 0, 0), food("Brioche", 9, 9, 9, 9))
            .expect("rename");
        assert_eq!(catalog.as_slice()[1].name().as_str(), "Brioche");

        let err = catalog
            .replace(&food("Brioche", 0, 0, 0, 0), food("Cheese", 1, 1, 1, 1))
            .expect_err("collision");
        assert!(matches!(err, NomError::DuplicateFood(_)));

        let err = catalog
            .replace(&food("Durian", 0, 0, 0, 0), food("Durian", 1, 1, 1, 1))
            .expect_err("absent");
        assert!(matches!(err, NomError::FoodNotFound(_)));
    }

    /// T0.3: get_existing returns the stored member, not the lookup value.
    #[test]
    fn get_existing_returns_stored_member() {
        let catalog = FoodCatalog::from_foods(vec![food("Apple", 100, 3, 40, 1)]).expect("catalog");
        let stored = catalog
            .get_existing(&food("Apple", 0, 0, 0, 0))
            .expect("present");
        assert_eq!(stored.calorie().amount(), 100);
    }

    /// T0.4: Goal validity boundary table.
    #[test]
    fn goal_boundaries() {
        let cases = [
            (MINIMUM_ACCEPTABLE_CALORIES - 1, false),
            (MINIMUM_ACCEPTABLE_CALORIES, true),
            (MAXIMUM_ACCEPTABLE_CALORIES, true),
            (MAXIMUM_ACCEPTABLE_CALORIES + 1, false),
            (UNSET_GOAL, false),
        ];
        for (value, valid) in cases {
            assert_eq!(DailyGoal::is_valid_goal(value), valid, "value {}", value);
        }
    }

    /// T0.5: A rejected goal keeps the previous value.
    #[test]
    fn rejected_goal_keeps_previous() {
        let mut goal = DailyGoal::unset();
        assert!(matches!(goal.set(-1), Err(NomError::InvalidArgument(_))));
        assert_eq!(goal.get(), UNSET_GOAL);

        goal.set(1800).expect("valid");
        assert!(matches!(goal.set(-1), Err(NomError::InvalidArgument(_))));
        assert_eq!(goal.get(), 1800);
    }
}

// =============================================================================
// TIER T1: CONSUMPTION AGGREGATION
// =============================================================================

mod t1_consumption {
    use super::*;

    /// T1.1: Portions accumulate and ratings average.
    #[test]
    fn portions_accumulate_ratings_average() {
        let apple = food("Apple", 100, 3, 40, 1);
        let mut record = ConsumptionRecord::new();
        record.consume(day(1), &apple, 1.0, rating(5)).expect("first");
        record.consume(day(1), &apple, 1.0, rating(3)).expect("second");

        let log = record.log_for(day(1));
        assert!((log.portion(&apple) - 2.0).abs() < f64::EPSILON);
        assert!((record.get_rating(day(1), &apple).expect("rated") - 4.0).abs() < f64::EPSILON);
    }

    /// T1.2: Remaining calories subtract the day's total from the goal.
    #[test]
    fn remaining_calories() {
        let apple = food("Apple", 100, 3, 40, 1);
        let mut record = ConsumptionRecord::new();
        record.consume(day(2), &apple, 2.0, None).expect("consume");

        let goal = DailyGoal::new(2000).expect("goal");
        let remaining = goal.remaining_calories(&record, day(2)).expect("goal set");
        assert!((remaining - 1800.0).abs() < f64::EPSILON);
    }

    /// T1.3: Remaining calories are undefined while the goal is unset.
    #[test]
    fn remaining_calories_require_goal() {
        let record = ConsumptionRecord::new();
        assert!(matches!(
            DailyGoal::unset().remaining_calories(&record, day(2)),
            Err(NomError::InvalidState(_))
        ));
    }

    /// T1.4a: Undoing an unrated serving leaves earlier ratings alone.
    #[test]
    fn unconsume_unrated_serving_keeps_rating() {
        let apple = food("Apple", 100, 3, 40, 1);
        let mut record = ConsumptionRecord::new();
        record.consume(day(3), &apple, 1.0, rating(5)).expect("rated");
        record.consume(day(3), &apple, 1.0, None).expect("unrated");
        record.unconsume(day(3), &apple, 1.0).expect("unconsume");

        assert!((record.get_rating(day(3), &apple).expect("still rated") - 5.0).abs() < f64::EPSILON);
        assert!((record.log_for(day(3)).portion(&apple) - 1.0).abs() < f64::EPSILON);
    }

    /// T1.4b: Undoing a serving eaten after a food edit restores the day total.
    #[test]
    fn unconsume_after_edit_restores_total() {
        let apple = food("Apple", 100, 3, 40, 1);
        let edited = food("Apple", 300, 3, 40, 1);
        let mut record = ConsumptionRecord::new();
        record.consume(day(3), &apple, 1.0, None).expect("before edit");
        record.consume(day(3), &edited, 1.0, None).expect("after edit");
        assert!((record.total_calories_consumed(day(3)) - 400.0).abs() < f64::EPSILON);

        record.unconsume(day(3), &edited, 1.0).expect("unconsume");
        assert!((record.total_calories_consumed(day(3)) - 100.0).abs() < f64::EPSILON);
    }

    /// T1.4: Unconsuming the whole portion drops the entry and the empty day.
    #[test]
    fn full_unconsume_drops_entry() {
        let apple = food("Apple", 100, 3, 40, 1);
        let mut record = ConsumptionRecord::new();
        record.consume(day(3), &apple, 1.5, rating(8)).expect("consume");
        record.unconsume(day(3), &apple, 2.0).expect("unconsume");

        assert!(record.log_for(day(3)).is_empty());
        assert!(record.is_empty());
        assert!(matches!(
            record.get_rating(day(3), &apple),
            Err(NomError::NotRated { .. })
        ));
    }

    /// T1.5: Unconsuming something never eaten is an error.
    #[test]
    fn unconsume_unknown_fails() {
        let mut record = ConsumptionRecord::new();
        assert!(matches!(
            record.unconsume(day(4), &food("Apple", 1, 1, 1, 1), 1.0),
            Err(NomError::NotConsumed { .. })
        ));
    }

    /// T1.6: Non-positive portions are rejected before any change.
    #[test]
    fn non_positive_portion_rejected() {
        let mut record = ConsumptionRecord::new();
        let apple = food("Apple", 1, 1, 1, 1);
        assert!(matches!(
            record.consume(day(5), &apple, 0.0, None),
            Err(NomError::InvalidArgument(_))
        ));
        assert!(record.is_empty());
    }

    /// T1.7: The week view runs oldest first and ends at the reference date.
    #[test]
    fn week_is_oldest_first() {
        let apple = food("Apple", 100, 0, 0, 0);
        let mut record = ConsumptionRecord::new();
        record.consume(day(1), &apple, 1.0, None).expect("consume");
        record.consume(day(7), &apple, 3.0, None).expect("consume");

        let week = record.past_week_logs(day(7));
        let totals: Vec<f64> = week.iter().map(|l| l.total_calories()).collect();
        assert_eq!(totals, vec![100.0, 0.0, 0.0, 0.0, 0.0, 0.0, 300.0]);
        assert_eq!(week[0].date(), day(1));
    }
}

// =============================================================================
// TIER T2: FILTERING
// =============================================================================

mod t2_filtering {
    use super::*;
    use nomnom_core::FoodAttribute;

    /// T2.1: Name auto-complete matches prefixes in either direction.
    #[test]
    fn name_prefix_either_direction() {
        let apple = food("Apple", 100, 3, 40, 1);
        assert!(FoodPredicate::name("Ap").expect("predicate").test(&apple));
        assert!(FoodPredicate::name("Apple Pie").expect("predicate").test(&apple));
        assert!(!FoodPredicate::name("Banana").expect("predicate").test(&apple));
    }

    /// T2.2: Nutrient predicates compare numerically.
    #[test]
    fn nutrient_equality_is_numeric() {
        let apple = food("Apple", 100, 3, 40, 1);
        let predicate = FoodPredicate::nutrient(FoodAttribute::Calorie, "0100").expect("predicate");
        assert!(predicate.test(&apple));

        assert!(matches!(
            FoodPredicate::nutrient(FoodAttribute::Fat, "lots"),
            Err(NomError::InvalidArgument(_))
        ));
    }

    /// T2.3: The catalog view follows the current predicate.
    #[test]
    fn view_is_not_a_snapshot() {
        let mut catalog =
            FoodCatalog::from_foods(vec![food("Apple", 1, 1, 1, 1)]).expect("catalog");
        let predicate = FoodPredicate::name("a").expect("predicate");

        assert_eq!(catalog.view(|f| predicate.test(f)).count(), 1);
        catalog.add(food("Avocado", 2, 2, 2, 2)).expect("add");
        assert_eq!(catalog.view(|f| predicate.test(f)).count(), 2);
    }
}

// =============================================================================
// TIER T3: PIPELINE AND PERSISTENCE
// =============================================================================

mod t3_pipeline {
    use super::*;

    fn create(name: &str, cal: &str) -> Command {
        let n = |v: &str| Some(Nutrient::parse(v).expect("nutrient"));
        Command::Update(FoodUpdate {
            calorie: n(cal),
            protein: n("1"),
            carbohydrate: n("1"),
            fat: n("1"),
            ..FoodUpdate::named(Name::parse(name).expect("name"))
        })
    }

    fn nom(name: &str, date: NaiveDate, portion: f64, r: u8) -> Command {
        Command::Nom {
            name: Name::parse(name).expect("name"),
            date,
            portion: Portion::new(portion).expect("portion"),
            rating: rating(r),
        }
    }

    /// T3.1: A session survives a restart through JSON files.
    #[test]
    fn session_survives_restart() {
        let dir = TempDir::new().expect("tempdir");
        let storage = JsonStorage::in_dir(dir.path());
        let model = bootstrap(&storage, &NullSink).expect("bootstrap");
        let mut pipeline = CommandPipeline::new(model, storage, Arc::new(NullSink));

        pipeline.execute(&Command::Clear).expect("clear");
        pipeline.execute(&create("Porridge", "300")).expect("create");
        pipeline.execute(&nom("Porridge", day(10), 2.0, 9)).expect("nom");
        pipeline.execute(&Command::Goal { calories: 2200 }).expect("goal");

        let storage = JsonStorage::in_dir(dir.path());
        let restored = bootstrap(&storage, &NullSink).expect("bootstrap");
        assert_eq!(restored.catalog(), pipeline.model().catalog());
        assert_eq!(restored.record(), pipeline.model().record());
        assert_eq!(restored.goal().get(), 2200);
        assert!((restored.record().total_calories_consumed(day(10)) - 600.0).abs() < f64::EPSILON);
    }

    /// T3.2: A failed mutation leaves the files untouched.
    #[test]
    fn failed_command_does_not_write() {
        let dir = TempDir::new().expect("tempdir");
        let storage = JsonStorage::in_dir(dir.path());
        let model = bootstrap(&storage, &NullSink).expect("bootstrap");
        let mut pipeline = CommandPipeline::new(model, storage, Arc::new(NullSink));

        let err = pipeline
            .execute(&nom("Nothing Here", day(1), 1.0, 5))
            .expect_err("unknown food");
        assert!(matches!(err, NomError::FoodNotFound(_)));
        for store in StoreKind::SAVE_ORDER {
            assert!(!pipeline.storage().exists(store));
        }
    }

    /// T3.3: A malformed store falls back to an empty default with a warning.
    #[test]
    fn malformed_store_bootstraps_empty() {
        let dir = TempDir::new().expect("tempdir");
        let storage = JsonStorage::in_dir(dir.path());
        std::fs::write(storage.path(StoreKind::Record), "{\"version\":1,\"days\":7}")
            .expect("write");

        let sink = MemorySink::new();
        let model = bootstrap(&storage, &sink).expect("bootstrap");
        assert!(model.record().is_empty());
        assert!(!model.catalog().is_empty());
        assert_eq!(sink.messages_at(nomnom_core::LogLevel::Warn).len(), 1);
    }

    /// T3.4: Write failure after the catalog write keeps the catalog on disk.
    #[test]
    fn partial_write_failure() {
        let dir = TempDir::new().expect("tempdir");
        let storage = JsonStorage::in_dir(dir.path());
        std::fs::create_dir_all(storage.path(StoreKind::Record)).expect("block record path");
        let mut pipeline =
            CommandPipeline::new(nomnom_core::Model::new(), storage, Arc::new(NullSink));

        let err = pipeline
            .execute(&create("Soup", "150"))
            .expect_err("record path is a directory");
        assert!(matches!(
            err,
            NomError::Persistence {
                store: StoreKind::Record,
                ..
            }
        ));
        assert_eq!(pipeline.model().catalog().len(), 1);
        let on_disk = pipeline.storage().read_catalog().expect("read").expect("saved");
        assert_eq!(on_disk.len(), 1);
        assert!(!pipeline.storage().exists(StoreKind::Goal));
    }
}
