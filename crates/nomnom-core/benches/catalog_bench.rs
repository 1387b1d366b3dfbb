//! # Catalog Benchmarks
//!
//! Performance benchmarks for nomnom-core catalog, filter and record paths.
//!
//! Run with: `cargo bench -p nomnom-core`

use chrono::{Days, NaiveDate};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use nomnom_core::{
    ConsumptionRecord, Food, FoodAttribute, FoodCatalog, FoodFilter, FoodPredicate,
    catalog_from_json, catalog_to_json, record_to_json,
};
use std::hint::black_box;

const TAGS: [&str; 4] = ["breakfast", "lunch", "dinner", "snack"];

fn make_food(i: usize) -> Food {
    Food::parse(
        &format!("Food {}", i),
        &(i % 900).to_string(),
        &(i % 50).to_string(),
        &(i % 120).to_string(),
        &(i % 40).to_string(),
        &[TAGS[i % TAGS.len()]],
    )
    .expect("valid food")
}

fn create_catalog(size: usize) -> FoodCatalog {
    FoodCatalog::from_foods((0..size).map(make_food).collect()).expect("unique names")
}

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")
}

/// A record with `days` logged days, five foods per day.
fn create_record(catalog: &FoodCatalog, days: u64) -> ConsumptionRecord {
    let mut record = ConsumptionRecord::new();
    for d in 0..days {
        let date = start().checked_add_days(Days::new(d)).expect("in range");
        for food in catalog.iter().skip(d as usize % 7).take(5) {
            let _ = record.consume(date, food, 1.5, None);
        }
    }
    record
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_catalog_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_add");

    for size in [100, 1000, 5000].iter() {
        let foods: Vec<Food> = (0..*size).map(make_food).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &foods, |b, foods| {
            b.iter(|| {
                let mut catalog = FoodCatalog::new();
                for food in foods {
                    let _ = catalog.add(food.clone());
                }
                black_box(catalog)
            });
        });
    }

    group.finish();
}

fn bench_filtered_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("filtered_view");

    for size in [100, 1000, 5000].iter() {
        let catalog = create_catalog(*size);
        let filter = FoodFilter::new(vec![
            FoodPredicate::name("Food 1").expect("predicate"),
            FoodPredicate::tags(vec!["snack".to_string()]).expect("predicate"),
            FoodPredicate::nutrient(FoodAttribute::Fat, "11").expect("predicate"),
        ]);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(catalog.view(|f| filter.test(f)).count()));
        });
    }

    group.finish();
}

fn bench_past_week(c: &mut Criterion) {
    let mut group = c.benchmark_group("past_week_logs");

    for days in [30u64, 365, 3650].iter() {
        let catalog = create_catalog(50);
        let record = create_record(&catalog, *days);
        let reference = start().checked_add_days(Days::new(days / 2)).expect("in range");

        group.bench_with_input(BenchmarkId::from_parameter(days), &reference, |b, &r| {
            b.iter(|| {
                let total: f64 = record
                    .past_week_logs(r)
                    .iter()
                    .map(|log| log.total_calories())
                    .sum();
                black_box(total)
            });
        });
    }

    group.finish();
}

fn bench_persistence_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("persistence");

    for size in [100, 1000].iter() {
        let catalog = create_catalog(*size);
        let record = create_record(&catalog, 365);
        let text = catalog_to_json(&catalog).expect("encode");

        group.bench_with_input(BenchmarkId::new("catalog_encode", size), size, |b, _| {
            b.iter(|| black_box(catalog_to_json(&catalog)));
        });
        group.bench_with_input(BenchmarkId::new("catalog_decode", size), &text, |b, t| {
            b.iter(|| black_box(catalog_from_json(t)));
        });
        group.bench_with_input(BenchmarkId::new("record_encode", size), size, |b, _| {
            b.iter(|| black_box(record_to_json(&record)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_catalog_add,
    bench_filtered_view,
    bench_past_week,
    bench_persistence_encode,
);
criterion_main!(benches);
