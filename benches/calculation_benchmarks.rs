//! Performance benchmarks for the work-time engine.
//!
//! Covers the hot paths:
//! - Expected-minute resolution for one date
//! - Daily summary construction
//! - Full balance rebuild over a quarter of punches
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Weekday};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use worktime_engine::WorkTimeEngine;
use worktime_engine::calculation::{
    DayExceptions, ScheduleResolver, build_daily_summary,
};
use worktime_engine::config::{ConfigLoader, EngineConfig};
use worktime_engine::models::{
    Employee, NewPunch, PunchEvent, PunchSlot, PunchSource, RuleMode, RuleRecurrence,
    ScheduleOverrideRule, WeekHours,
};
use worktime_engine::store::MemoryStore;

fn load_config() -> EngineConfig {
    ConfigLoader::load("./config/default").expect("Failed to load config")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// An employee on a two-week rotating cycle.
fn cycle_employee() -> Employee {
    let full: WeekHours = ["monday", "tuesday", "wednesday", "thursday", "friday"]
        .iter()
        .map(|day| (day.to_string(), Decimal::new(8, 0)))
        .collect();
    let short: WeekHours = ["monday", "tuesday", "wednesday"]
        .iter()
        .map(|day| (day.to_string(), Decimal::new(6, 0)))
        .collect();

    let mut employee = Employee::new("emp_bench_001", "BY");
    employee.employment_percentage = Some(Decimal::new(80, 0));
    employee.schedule.weekly_cycle = vec![full, short];
    employee
}

fn rules(count: u64) -> Vec<ScheduleOverrideRule> {
    (0..count)
        .map(|i| ScheduleOverrideRule {
            id: i,
            employee_id: "emp_bench_001".to_string(),
            recurrence: RuleRecurrence::Recurring,
            start_date: date(2025, 1, 3),
            end_date: None,
            repeat_interval_days: Some(7 * (i as u32 % 4 + 1)),
            weekday: Some(Weekday::Fri),
            mode: if i % 2 == 0 { RuleMode::Off } else { RuleMode::HalfDay },
        })
        .collect()
}

fn day_punches(on: NaiveDate, pairs: usize) -> Vec<PunchEvent> {
    let mut punches = Vec::with_capacity(pairs * 2);
    for i in 0..pairs {
        let start = on.and_hms_opt(6, 0, 0).expect("valid time")
            + chrono::Duration::minutes(i as i64 * 90);
        let end = start + chrono::Duration::minutes(75);
        let start_slot = PunchSlot::from_ordinal((i * 2 + 1) as u8);
        let end_slot = PunchSlot::from_ordinal((i * 2 + 2) as u8);
        punches.push(NewPunch::new("emp_bench_001", start, start_slot, PunchSource::Hardware).into_event());
        punches.push(NewPunch::new("emp_bench_001", end, end_slot, PunchSource::Hardware).into_event());
    }
    punches
}

/// Benchmark: Expected minutes for a single date.
fn bench_resolve_expected(c: &mut Criterion) {
    let config = load_config();
    let resolver = ScheduleResolver::new(config.schedule());
    let employee = cycle_employee();
    let exceptions = DayExceptions::none();

    let mut group = c.benchmark_group("resolve_expected");
    for rule_count in [0u64, 4, 32] {
        let rules = rules(rule_count);
        group.bench_with_input(BenchmarkId::new("rules", rule_count), &rules, |b, rules| {
            b.iter(|| {
                black_box(resolver.expected_minutes(
                    black_box(&employee),
                    rules,
                    &exceptions,
                    black_box(date(2026, 1, 16)),
                ))
            })
        });
    }
    group.finish();
}

/// Benchmark: Daily summary with increasing punch counts.
fn bench_daily_summary(c: &mut Criterion) {
    let on = date(2026, 1, 15);
    let mut group = c.benchmark_group("daily_summary");

    for pairs in [1usize, 2, 4, 8] {
        let punches = day_punches(on, pairs);
        group.throughput(Throughput::Elements(punches.len() as u64));
        group.bench_with_input(BenchmarkId::new("punches", punches.len()), &punches, |b, punches| {
            b.iter(|| black_box(build_daily_summary("emp_bench_001", on, black_box(punches))))
        });
    }
    group.finish();
}

/// Benchmark: Balance rebuild over one quarter of working days.
fn bench_rebuild_quarter(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let store = Arc::new(MemoryStore::new());
    store.upsert_employee(cycle_employee());

    let mut days = 0u64;
    for on in date(2026, 1, 1).iter_days().take(90) {
        if matches!(on.weekday(), Weekday::Sat | Weekday::Sun) {
            continue;
        }
        for punch in day_punches(on, 2) {
            store
                .record_punch(NewPunch::new(
                    punch.employee_id,
                    punch.timestamp,
                    punch.slot,
                    punch.source,
                ))
                .expect("unique slots");
        }
        days += 1;
    }

    let engine = WorkTimeEngine::new(Arc::clone(&store), load_config());

    let mut group = c.benchmark_group("balance");
    group.throughput(Throughput::Elements(days));
    group.sample_size(20);
    group.bench_function("rebuild_quarter", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(engine.rebuild_balance("emp_bench_001").await) })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_resolve_expected,
    bench_daily_summary,
    bench_rebuild_quarter,
);
criterion_main!(benches);
