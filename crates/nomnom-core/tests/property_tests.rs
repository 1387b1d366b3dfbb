//! # Property-Based Tests
//!
//! Invariants of the catalog, the daily log and the record under arbitrary
//! operation sequences.

use chrono::{Days, NaiveDate};
use nomnom_core::{
    ConsumptionRecord, DailyFoodLog, Food, FoodCatalog, FoodPredicate, Rating, catalog_from_json,
    catalog_to_json,
};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::BTreeSet;

// =============================================================================
// STRATEGIES
// =============================================================================

fn name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Apple", "Bagel", "Cheese", "Dates", "Eggs", "Fig Jam", "Granola",
    ])
    .prop_map(str::to_string)
}

fn food_strategy() -> impl Strategy<Value = Food> {
    (
        name_strategy(),
        0u32..2000,
        0u32..100,
        0u32..300,
        0u32..100,
        vec("[a-z]{1,6}", 0..3),
    )
        .prop_map(|(name, cal, protein, carb, fat, tags)| {
            let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
            Food::parse(
                &name,
                &cal.to_string(),
                &protein.to_string(),
                &carb.to_string(),
                &fat.to_string(),
                &tags,
            )
            .expect("generated fields are valid")
        })
}

#[derive(Debug, Clone)]
enum CatalogOp {
    Add(Food),
    Replace(Food, Food),
    Remove(Food),
}

fn catalog_op_strategy() -> impl Strategy<Value = CatalogOp> {
    prop_oneof![
        food_strategy().prop_map(CatalogOp::Add),
        (food_strategy(), food_strategy()).prop_map(|(a, b)| CatalogOp::Replace(a, b)),
        food_strategy().prop_map(CatalogOp::Remove),
    ]
}

fn portion_strategy() -> impl Strategy<Value = f64> {
    (1u32..=400).prop_map(|quarters| f64::from(quarters) / 4.0)
}

fn rating_strategy() -> impl Strategy<Value = Option<Rating>> {
    prop::option::of((1u8..=10).prop_map(|r| Rating::new(r).expect("in range")))
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).expect("valid date")
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Identical field values give fully-equal foods; identity follows the name.
    #[test]
    fn equality_from_identical_fields(a in food_strategy(), b in food_strategy()) {
        let tags: Vec<&str> = a.tags().iter().map(|t| t.as_str()).collect();
        let twin = Food::parse(
            a.name().as_str(),
            a.calorie().as_str(),
            a.protein().as_str(),
            a.carbohydrate().as_str(),
            a.fat().as_str(),
            &tags,
        ).expect("valid");

        prop_assert_eq!(&twin, &a);
        prop_assert!(twin.is_same_food(&a));
        prop_assert_eq!(a.is_same_food(&b), a.name() == b.name());
    }

    /// No two members ever share identity, whatever the operation history.
    #[test]
    fn catalog_uniqueness_holds(ops in vec(catalog_op_strategy(), 1..60)) {
        let mut catalog = FoodCatalog::new();

        for op in ops {
            let before = catalog.clone();
            let outcome = match op {
                CatalogOp::Add(food) => catalog.add(food),
                CatalogOp::Replace(target, replacement) => catalog.replace(&target, replacement),
                CatalogOp::Remove(food) => catalog.remove(&food).map(|_| ()),
            };
            if outcome.is_err() {
                prop_assert_eq!(&catalog, &before);
            }

            let names: BTreeSet<_> = catalog.iter().map(|f| f.name().clone()).collect();
            prop_assert_eq!(names.len(), catalog.len());
        }
    }

    /// The catalog view preserves catalog order.
    #[test]
    fn view_is_order_preserving(foods in vec(food_strategy(), 0..20), keyword in "[a-z]{1,3}") {
        let mut catalog = FoodCatalog::new();
        for food in foods {
            let _ = catalog.add(food);
        }
        let predicate = FoodPredicate::tags(vec![keyword]).expect("predicate");

        let viewed: Vec<&Food> = catalog.view(|f| predicate.test(f)).collect();
        let expected: Vec<&Food> = catalog.iter().filter(|f| predicate.test(f)).collect();
        prop_assert_eq!(viewed, expected);
    }

    /// consume(f, p, r) then unconsume(f, p) restores the previous log,
    /// whether or not either side was rated and whatever value `f` had
    /// when it was eaten before.
    #[test]
    fn consume_then_unconsume_restores_log(
        history in vec((food_strategy(), portion_strategy(), rating_strategy()), 0..10),
        food in food_strategy(),
        portion in portion_strategy(),
        rating in rating_strategy(),
    ) {
        let mut log = DailyFoodLog::new(date());
        for (f, p, r) in &history {
            log.consume(f, *p, *r).expect("consume");
        }
        let before = log.clone();

        log.consume(&food, portion, rating).expect("consume");
        log.unconsume(&food, portion).expect("unconsume");

        prop_assert_eq!(log.entries().len(), before.entries().len());
        for (after, prior) in log.entries().iter().zip(before.entries()) {
            prop_assert_eq!(after.food(), prior.food());
            prop_assert!((after.portion() - prior.portion()).abs() < 1e-9);
            prop_assert_eq!(after.ratings(), prior.ratings());
        }
        prop_assert!((log.total_calories() - before.total_calories()).abs() < 1e-6);
        prop_assert_eq!(&log, &before);
    }

    /// Looking up any date with no consumption gives an empty log.
    #[test]
    fn log_for_unknown_date_is_empty(offset in 0u64..3650) {
        let mut record = ConsumptionRecord::new();
        let apple = Food::parse("Apple", "95", "0", "25", "0", &[]).expect("food");
        record.consume(date(), &apple, 1.0, None).expect("consume");

        let other_day = date().checked_add_days(Days::new(offset + 1)).expect("in range");
        let log = record.log_for(other_day);
        prop_assert!(log.is_empty());
        prop_assert_eq!(log.date(), other_day);
    }

    /// The week view is always seven consecutive days ending at the reference.
    #[test]
    fn past_week_is_seven_consecutive_days(offset in 0u64..3650) {
        let reference = date().checked_add_days(Days::new(offset)).expect("in range");
        let record = ConsumptionRecord::new();
        let week = record.past_week_logs(reference);

        prop_assert_eq!(week.len(), 7);
        prop_assert_eq!(week[6].date(), reference);
        for pair in week.windows(2) {
            prop_assert_eq!(pair[0].date().succ_opt(), Some(pair[1].date()));
        }
    }

    /// Catalog encoding is stable across a load/save cycle.
    #[test]
    fn catalog_json_is_stable(foods in vec(food_strategy(), 0..10)) {
        let mut catalog = FoodCatalog::new();
        for food in foods {
            let _ = catalog.add(food);
        }
        let text = catalog_to_json(&catalog).expect("encode");
        let restored = catalog_from_json(&text).expect("decode");
        prop_assert_eq!(&restored, &catalog);
        prop_assert_eq!(catalog_to_json(&restored).expect("encode"), text);
    }
}
