//! Overtime/undertime balance maintenance.
//!
//! The balance of an employee is the sum, over every date with punch
//! activity or an explicit calendar exception, of worked minus expected
//! minutes. Any other date is uncounted and contributes a zero delta.
//! [`BalanceAccumulator`] computes per-date deltas, rebuilds the total from
//! scratch and applies single-date incremental changes.
//!
//! Updates for one employee are serialized through a per-employee async
//! mutex; different employees never contend.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info};

use crate::calculation::{
    EmployeeCalendar, ExceptionCalendar, ExpectedDay, ScheduleResolver, build_daily_summary,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, PunchEvent, ScheduleOverrideRule};
use crate::store::TimeStore;

/// Worked, expected and delta minutes for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBalance {
    /// The calendar day.
    pub date: NaiveDate,
    /// Minutes worked according to the punches.
    pub worked_minutes: i64,
    /// Minutes the schedule expects.
    pub expected_minutes: i64,
    /// True if the date has punches or a calendar exception.
    pub counted: bool,
    /// `worked_minutes - expected_minutes` for counted dates, else 0.
    pub delta: i64,
    /// True if the day's punches need human attention.
    pub needs_correction: bool,
}

/// Exclusive right to update one employee's balance.
///
/// Obtained from [`BalanceAccumulator::lock_employee`]; released on drop.
#[derive(Debug)]
pub struct EmployeeGuard {
    employee_id: String,
    _guard: OwnedMutexGuard<()>,
}

impl EmployeeGuard {
    /// The employee this guard locks.
    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }
}

#[derive(Debug, Default)]
struct EmployeeLocks {
    locks: parking_lot::Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl EmployeeLocks {
    async fn lock(&self, employee_id: &str) -> EmployeeGuard {
        let lock = Arc::clone(
            self.locks
                .lock()
                .entry(employee_id.to_string())
                .or_default(),
        );
        EmployeeGuard {
            employee_id: employee_id.to_string(),
            _guard: lock.lock_owned().await,
        }
    }
}

/// Everything needed to evaluate any date for one employee.
struct EmployeeContext {
    employee: Employee,
    rules: Vec<ScheduleOverrideRule>,
    calendar: EmployeeCalendar,
}

/// Drives the resolver and summary builder to maintain balances.
pub struct BalanceAccumulator<S> {
    store: Arc<S>,
    resolver: ScheduleResolver,
    calendar: ExceptionCalendar,
    locks: EmployeeLocks,
}

impl<S: TimeStore> BalanceAccumulator<S> {
    /// Creates an accumulator over a store.
    pub fn new(store: Arc<S>, resolver: ScheduleResolver, calendar: ExceptionCalendar) -> Self {
        Self {
            store,
            resolver,
            calendar,
            locks: EmployeeLocks::default(),
        }
    }

    /// Waits for exclusive update rights on an employee's balance.
    pub async fn lock_employee(&self, employee_id: &str) -> EmployeeGuard {
        self.locks.lock(employee_id).await
    }

    async fn load_context(&self, employee_id: &str) -> EngineResult<EmployeeContext> {
        let employee = self
            .store
            .employee(employee_id)
            .await?
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })?;
        let rules = self.store.override_rules(employee_id).await?;
        let calendar = self.store.employee_calendar(employee_id).await?;
        Ok(EmployeeContext {
            employee,
            rules,
            calendar,
        })
    }

    fn expected_for(
        &self,
        context: &EmployeeContext,
        date: NaiveDate,
        punches: &[PunchEvent],
    ) -> ExpectedDay {
        let exceptions = self.calendar.day_exceptions(
            &context.employee,
            &context.calendar,
            date,
            !punches.is_empty(),
        );
        self.resolver
            .resolve(&context.employee, &context.rules, &exceptions, date)
    }

    fn balance_for(
        &self,
        context: &EmployeeContext,
        date: NaiveDate,
        punches: &[PunchEvent],
    ) -> DayBalance {
        let summary = build_daily_summary(&context.employee.id, date, punches);
        let expected = self.expected_for(context, date, punches);
        let counted = !punches.is_empty() || context.calendar.exception_dates().contains(&date);
        DayBalance {
            date,
            worked_minutes: summary.worked_minutes,
            expected_minutes: expected.minutes,
            counted,
            delta: if counted {
                summary.worked_minutes - expected.minutes
            } else {
                0
            },
            needs_correction: summary.needs_correction,
        }
    }

    /// Resolves the expected day for an employee, with the same exception
    /// handling used for deltas.
    pub async fn resolve_expected(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> EngineResult<ExpectedDay> {
        let context = self.load_context(employee_id).await?;
        let punches = self.store.punches_on(employee_id, date).await?;
        Ok(self.expected_for(&context, date, &punches))
    }

    /// Computes worked, expected and delta minutes for one date.
    pub async fn day_balance(&self, employee_id: &str, date: NaiveDate) -> EngineResult<DayBalance> {
        let context = self.load_context(employee_id).await?;
        let punches = self.store.punches_on(employee_id, date).await?;
        Ok(self.balance_for(&context, date, &punches))
    }

    /// Worked minus expected minutes for one date, or 0 if the date is
    /// uncounted.
    pub async fn compute_daily_delta(&self, employee_id: &str, date: NaiveDate) -> EngineResult<i64> {
        let balance = self.day_balance(employee_id, date).await?;
        debug!(
            employee_id,
            date = %date,
            worked = balance.worked_minutes,
            expected = balance.expected_minutes,
            delta = balance.delta,
            "Computed daily delta"
        );
        Ok(balance.delta)
    }

    /// Per-date balances for every date in `from..=to`.
    pub async fn daily_deltas(
        &self,
        employee_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<DayBalance>> {
        let context = self.load_context(employee_id).await?;
        let mut days = Vec::new();
        for date in from.iter_days().take_while(|date| *date <= to) {
            let punches = self.store.punches_on(employee_id, date).await?;
            days.push(self.balance_for(&context, date, &punches));
        }
        Ok(days)
    }

    /// Recomputes the balance from scratch and replaces the stored total.
    ///
    /// Every delta is computed before anything is written, so a failure
    /// leaves the stored balance untouched.
    pub async fn rebuild(&self, employee_id: &str) -> EngineResult<i64> {
        let _guard = self.lock_employee(employee_id).await;
        let context = self.load_context(employee_id).await?;

        let mut dates: BTreeSet<NaiveDate> = self
            .store
            .punch_dates(employee_id)
            .await?
            .into_iter()
            .collect();
        dates.extend(context.calendar.exception_dates());

        let mut total = 0i64;
        for date in &dates {
            let punches = self.store.punches_on(employee_id, *date).await?;
            total += self.balance_for(&context, *date, &punches).delta;
        }

        self.store.replace_balance(employee_id, total).await?;
        info!(
            employee_id,
            dates = dates.len(),
            balance_minutes = total,
            "Rebuilt balance"
        );
        Ok(total)
    }

    /// Adjusts the stored balance by `new_delta - old_delta` for one date.
    pub async fn apply_incremental(
        &self,
        employee_id: &str,
        date: NaiveDate,
        old_delta: i64,
        new_delta: i64,
    ) -> EngineResult<i64> {
        let guard = self.lock_employee(employee_id).await;
        self.apply_incremental_locked(&guard, date, old_delta, new_delta)
            .await
    }

    /// Same as [`apply_incremental`](Self::apply_incremental) for a caller
    /// already holding the employee's guard.
    pub async fn apply_incremental_locked(
        &self,
        guard: &EmployeeGuard,
        date: NaiveDate,
        old_delta: i64,
        new_delta: i64,
    ) -> EngineResult<i64> {
        let employee_id = guard.employee_id();
        let change = new_delta - old_delta;
        let total = self.store.adjust_balance(employee_id, change).await?;
        debug!(
            employee_id,
            date = %date,
            change,
            balance_minutes = total,
            "Applied incremental balance change"
        );
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{HolidayCache, RuleHolidayProvider};
    use crate::models::{
        Absence, AbsenceKind, DayPortion, NewPunch, PunchSlot, PunchSource,
    };
    use crate::store::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn accumulator(store: Arc<MemoryStore>) -> BalanceAccumulator<MemoryStore> {
        let holidays = Arc::new(HolidayCache::new(RuleHolidayProvider::default()));
        BalanceAccumulator::new(
            store,
            ScheduleResolver::default(),
            ExceptionCalendar::new(holidays),
        )
    }

    fn punch(store: &MemoryStore, on: NaiveDate, h: u32, m: u32, ordinal: u8) {
        store
            .record_punch(NewPunch::new(
                "emp_001",
                on.and_hms_opt(h, m, 0).unwrap(),
                PunchSlot::from_ordinal(ordinal),
                PunchSource::Hardware,
            ))
            .unwrap();
    }

    fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.upsert_employee(Employee::new("emp_001", "BY"));
        store
    }

    #[tokio::test]
    async fn test_daily_delta_for_standard_day() {
        let store = seeded_store();
        let thursday = date(2026, 1, 15);
        punch(&store, thursday, 9, 0, 1);
        punch(&store, thursday, 12, 0, 2);
        punch(&store, thursday, 13, 0, 3);
        punch(&store, thursday, 17, 0, 4);

        let balances = accumulator(Arc::clone(&store));
        assert_eq!(balances.compute_daily_delta("emp_001", thursday).await.unwrap(), -90);
    }

    #[tokio::test]
    async fn test_unknown_employee_is_not_found() {
        let balances = accumulator(Arc::new(MemoryStore::new()));
        let result = balances.rebuild("ghost").await;
        assert!(matches!(result, Err(EngineError::EmployeeNotFound { .. })));
    }

    #[tokio::test]
    async fn test_rebuild_sums_activity_and_exception_dates() {
        let store = seeded_store();
        // Thursday: 8h worked vs 8.5h expected => -30
        punch(&store, date(2026, 1, 15), 8, 0, 1);
        punch(&store, date(2026, 1, 15), 16, 0, 2);
        // Saturday: 2h worked vs 0 expected => +120
        punch(&store, date(2026, 1, 17), 10, 0, 1);
        punch(&store, date(2026, 1, 17), 12, 0, 2);
        // Half-day vacation Monday without punches => -255
        store.add_absence(Absence {
            employee_id: "emp_001".to_string(),
            kind: AbsenceKind::Vacation,
            start_date: date(2026, 1, 19),
            end_date: date(2026, 1, 19),
            portion: DayPortion::Half,
        });

        let balances = accumulator(Arc::clone(&store));
        let total = balances.rebuild("emp_001").await.unwrap();
        assert_eq!(total, -30 + 120 - 255);
        assert_eq!(store.balance_of("emp_001"), Some(total));

        assert_eq!(balances.rebuild("emp_001").await.unwrap(), total);
    }

    #[tokio::test]
    async fn test_incremental_matches_rebuild() {
        let store = seeded_store();
        let thursday = date(2026, 1, 15);
        punch(&store, thursday, 8, 0, 1);

        let balances = accumulator(Arc::clone(&store));
        balances.rebuild("emp_001").await.unwrap();
        let before = balances.compute_daily_delta("emp_001", thursday).await.unwrap();

        punch(&store, thursday, 17, 0, 2);
        let after = balances.compute_daily_delta("emp_001", thursday).await.unwrap();
        let incremental = balances
            .apply_incremental("emp_001", thursday, before, after)
            .await
            .unwrap();

        assert_eq!(incremental, balances.rebuild("emp_001").await.unwrap());
        assert_eq!(incremental, 540 - 510);
    }

    #[tokio::test]
    async fn test_daily_deltas_covers_range() {
        let store = seeded_store();
        punch(&store, date(2026, 1, 16), 9, 0, 1);
        punch(&store, date(2026, 1, 16), 18, 0, 2);

        let balances = accumulator(Arc::clone(&store));
        let days = balances
            .daily_deltas("emp_001", date(2026, 1, 15), date(2026, 1, 18))
            .await
            .unwrap();

        let deltas: Vec<i64> = days.iter().map(|d| d.delta).collect();
        assert_eq!(deltas, vec![0, 30, 0, 0]);
        assert!(!days[0].counted);
        assert_eq!(days[0].expected_minutes, 510);
        assert_eq!(days[1].worked_minutes, 540);
    }

    #[tokio::test]
    async fn test_uncounted_date_has_zero_delta() {
        let store = seeded_store();
        let balances = accumulator(Arc::clone(&store));
        assert_eq!(balances.compute_daily_delta("emp_001", date(2026, 1, 15)).await.unwrap(), 0);

        punch(&store, date(2026, 1, 15), 9, 0, 1);
        assert_eq!(balances.compute_daily_delta("emp_001", date(2026, 1, 15)).await.unwrap(), -510);
    }

    #[tokio::test]
    async fn test_concurrent_incremental_updates_are_not_lost() {
        let store = seeded_store();
        let balances = Arc::new(accumulator(Arc::clone(&store)));

        let mut handles = Vec::new();
        for _ in 0..20 {
            let balances = Arc::clone(&balances);
            handles.push(tokio::spawn(async move {
                balances
                    .apply_incremental("emp_001", date(2026, 1, 15), 0, 5)
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.balance_of("emp_001"), Some(100));
    }
}
