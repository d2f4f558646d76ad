//! Single entry point wiring configuration, calculations and services.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use crate::calculation::{
    ExceptionCalendar, ExpectedDay, HolidayCache, RuleHolidayProvider, ScheduleResolver,
    build_daily_summary,
};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{DailySummary, PunchEvent};
use crate::services::{AutoCloseReport, AutoCloser, AutoCloserState, BalanceAccumulator, DayBalance};
use crate::store::TimeStore;

/// The work-time reconciliation engine.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use chrono::NaiveDate;
/// use worktime_engine::WorkTimeEngine;
/// use worktime_engine::config::EngineConfig;
/// use worktime_engine::models::Employee;
/// use worktime_engine::store::MemoryStore;
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// runtime.block_on(async {
///     let store = Arc::new(MemoryStore::new());
///     store.upsert_employee(Employee::new("emp_001", "BY"));
///
///     let engine = WorkTimeEngine::new(store, EngineConfig::default());
///     let thursday = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
///     let minutes = engine.resolve_expected_minutes("emp_001", thursday).await.unwrap();
///     assert_eq!(minutes, 510);
/// });
/// ```
pub struct WorkTimeEngine<S> {
    store: Arc<S>,
    config: EngineConfig,
    holidays: Arc<HolidayCache>,
    balances: Arc<BalanceAccumulator<S>>,
    auto_closer: AutoCloser<S>,
}

impl<S: TimeStore + 'static> WorkTimeEngine<S> {
    /// Builds an engine over a store.
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        let holidays = Arc::new(HolidayCache::new(RuleHolidayProvider::new(
            config.holidays().to_vec(),
        )));
        let balances = Arc::new(BalanceAccumulator::new(
            Arc::clone(&store),
            ScheduleResolver::new(config.schedule()),
            ExceptionCalendar::new(Arc::clone(&holidays)),
        ));
        let auto_closer = AutoCloser::new(
            Arc::clone(&store),
            Arc::clone(&balances),
            config.auto_close().clone(),
        );
        info!(
            holiday_rules = config.holidays().len(),
            workers = config.auto_close().workers,
            "Work-time engine initialized"
        );
        Self {
            store,
            config,
            holidays,
            balances,
            auto_closer,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The shared holiday cache.
    pub fn holiday_cache(&self) -> &Arc<HolidayCache> {
        &self.holidays
    }

    /// The balance accumulator.
    pub fn balances(&self) -> &Arc<BalanceAccumulator<S>> {
        &self.balances
    }

    /// Minutes the employee is expected to work on `date`.
    pub async fn resolve_expected_minutes(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> EngineResult<i64> {
        Ok(self.resolve_expected(employee_id, date).await?.minutes)
    }

    /// Expected minutes with the adjustments that produced them.
    pub async fn resolve_expected(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> EngineResult<ExpectedDay> {
        self.balances.resolve_expected(employee_id, date).await
    }

    /// Summarizes the given punches for a known employee.
    pub async fn build_daily_summary(
        &self,
        employee_id: &str,
        date: NaiveDate,
        punches: &[PunchEvent],
    ) -> EngineResult<DailySummary> {
        if self.store.employee(employee_id).await?.is_none() {
            return Err(EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            });
        }
        Ok(build_daily_summary(employee_id, date, punches))
    }

    /// Summarizes the stored punches of one day.
    pub async fn summarize_day(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> EngineResult<DailySummary> {
        let punches = self.store.punches_on(employee_id, date).await?;
        self.build_daily_summary(employee_id, date, &punches).await
    }

    /// Worked minus expected minutes for one date.
    pub async fn compute_daily_delta(&self, employee_id: &str, date: NaiveDate) -> EngineResult<i64> {
        self.balances.compute_daily_delta(employee_id, date).await
    }

    /// Per-date balances over an inclusive range.
    pub async fn daily_deltas(
        &self,
        employee_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<DayBalance>> {
        self.balances.daily_deltas(employee_id, from, to).await
    }

    /// Recomputes and stores the employee's balance.
    pub async fn rebuild_balance(&self, employee_id: &str) -> EngineResult<i64> {
        self.balances.rebuild(employee_id).await
    }

    /// Applies a single-date delta change to the stored balance.
    pub async fn apply_incremental(
        &self,
        employee_id: &str,
        date: NaiveDate,
        old_delta: i64,
        new_delta: i64,
    ) -> EngineResult<i64> {
        self.balances
            .apply_incremental(employee_id, date, old_delta, new_delta)
            .await
    }

    /// Runs one auto-close pass against `cutoff`.
    pub async fn run_auto_close_pass(&self, cutoff: NaiveDateTime) -> EngineResult<AutoCloseReport> {
        self.auto_closer.run_pass(cutoff).await
    }

    /// Runs one auto-close pass at the configured cutoff time of `date`.
    pub async fn run_auto_close_for(&self, date: NaiveDate) -> EngineResult<AutoCloseReport> {
        self.auto_closer
            .run_pass(self.auto_closer.cutoff_on(date))
            .await
    }

    /// Whether an auto-close pass is running.
    pub fn auto_close_state(&self) -> AutoCloserState {
        self.auto_closer.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::{Employee, NewPunch, PunchSlot, PunchSource};
    use crate::store::MemoryStore;

    fn engine() -> (Arc<MemoryStore>, WorkTimeEngine<MemoryStore>) {
        let config = ConfigLoader::load("./config/default").unwrap();
        let store = Arc::new(MemoryStore::new());
        store.upsert_employee(Employee::new("emp_001", "BY"));
        let engine = WorkTimeEngine::new(Arc::clone(&store), config);
        (store, engine)
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_configured_holiday_is_not_expected() {
        let (_store, engine) = engine();
        // Labour Day 2026 falls on a Friday.
        assert_eq!(engine.resolve_expected_minutes("emp_001", date(5, 1)).await.unwrap(), 0);
        assert_eq!(engine.resolve_expected_minutes("emp_001", date(4, 30)).await.unwrap(), 510);
    }

    #[tokio::test]
    async fn test_holiday_cache_is_shared_with_resolution() {
        let (_store, engine) = engine();
        assert!(engine.holiday_cache().is_empty());

        engine.resolve_expected_minutes("emp_001", date(5, 1)).await.unwrap();
        assert_eq!(engine.holiday_cache().len(), 1);
        assert_eq!(engine.config().auto_close().workers, 4);

        let expected = engine.balances().resolve_expected("emp_001", date(5, 1)).await.unwrap();
        assert_eq!(expected.minutes, 0);
        assert_eq!(engine.holiday_cache().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_employee_summary_is_rejected() {
        let (_store, engine) = engine();
        let result = engine.build_daily_summary("ghost", date(1, 15), &[]).await;
        assert!(matches!(result, Err(EngineError::EmployeeNotFound { .. })));
    }

    #[tokio::test]
    async fn test_summarize_day_reads_store() {
        let (store, engine) = engine();
        for (h, slot) in [(9, PunchSlot::DayStart), (17, PunchSlot::DayEnd)] {
            store
                .record_punch(NewPunch::new(
                    "emp_001",
                    date(1, 15).and_hms_opt(h, 0, 0).unwrap(),
                    slot,
                    PunchSource::Manual,
                ))
                .unwrap();
        }
        let summary = engine.summarize_day("emp_001", date(1, 15)).await.unwrap();
        assert_eq!(summary.worked_minutes, 480);
        assert_eq!(engine.compute_daily_delta("emp_001", date(1, 15)).await.unwrap(), -30);
    }

    #[tokio::test]
    async fn test_auto_close_for_uses_configured_cutoff() {
        let (store, engine) = engine();
        store
            .record_punch(NewPunch::new(
                "emp_001",
                date(1, 15).and_hms_opt(9, 0, 0).unwrap(),
                PunchSlot::DayStart,
                PunchSource::Hardware,
            ))
            .unwrap();

        let report = engine.run_auto_close_for(date(1, 15)).await.unwrap();
        assert_eq!(report.cutoff, date(1, 15).and_hms_opt(23, 20, 0).unwrap());
        assert_eq!(report.days_closed, 1);
        assert_eq!(engine.auto_close_state(), AutoCloserState::Idle);
    }
}
