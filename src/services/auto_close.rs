//! Closing of forgotten open work sessions.
//!
//! At the daily cutoff every employee day that has punches but no day-end
//! punch gets one. What is written depends only on the last recorded slot
//! and on whether the employee works a reduced percentage:
//!
//! | Last slot      | Regular employee          | Percentage employee       |
//! |----------------|---------------------------|---------------------------|
//! | #1 day start   | append #4                 | append #4                 |
//! | #2 break start | append #3 then #4         | relabel #2 as #4          |
//! | #3 break end   | append #4                 | append #4                 |
//! | #4 day end     | nothing                   | nothing                   |
//! | #5+            | append #4 if none exists  | append #4 if none exists  |
//!
//! Written punches are tagged [`PunchSource::SystemAutoClose`], which flags
//! the day for correction. Each closed day's balance delta is applied under
//! the employee's balance lock.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::AutoCloseSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{NewPunch, PunchSlot, PunchSource};
use crate::services::{BalanceAccumulator, PunchWriter};
use crate::store::TimeStore;

const AUTO_CLOSE_NOTE: &str = "Closed automatically at cutoff";

/// What to write for an open day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAction {
    /// Append a day-end punch.
    AppendDayEnd,
    /// Append a break-end punch, then a day-end punch.
    AppendBreakEndThenDayEnd,
    /// Move the break-start punch into the day-end slot.
    RelabelAsDayEnd,
    /// The day is already closed.
    Nothing,
}

/// Chooses the close action from the day's last slot.
pub fn plan_close(last: PunchSlot, percentage_based: bool) -> CloseAction {
    match (last, percentage_based) {
        (PunchSlot::DayEnd, _) => CloseAction::Nothing,
        (PunchSlot::BreakStart, true) => CloseAction::RelabelAsDayEnd,
        (PunchSlot::BreakStart, false) => CloseAction::AppendBreakEndThenDayEnd,
        (PunchSlot::DayStart | PunchSlot::BreakEnd | PunchSlot::Extra(_), _) => {
            CloseAction::AppendDayEnd
        }
    }
}

/// Whether a pass is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoCloserState {
    /// No pass is running.
    Idle,
    /// A pass is running.
    Running,
}

/// A day that could not be closed.
#[derive(Debug, Clone, Serialize)]
pub struct AutoCloseFailure {
    /// The employee.
    pub employee_id: String,
    /// The day that stayed open.
    pub date: NaiveDate,
    /// Rendered error.
    pub error: String,
}

/// Summary of one auto-close pass.
#[derive(Debug, Clone, Serialize)]
pub struct AutoCloseReport {
    /// Identifier for correlating log lines of this pass.
    pub run_id: Uuid,
    /// The cutoff the pass ran against.
    pub cutoff: NaiveDateTime,
    /// Employees with at least one day closed by this pass.
    pub employees_closed: usize,
    /// Days closed by this pass.
    pub days_closed: usize,
    /// Days that failed.
    pub failures: Vec<AutoCloseFailure>,
}

impl AutoCloseReport {
    fn new(cutoff: NaiveDateTime) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            cutoff,
            employees_closed: 0,
            days_closed: 0,
            failures: Vec::new(),
        }
    }

    /// True if every open day was handled.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug)]
struct EmployeeOutcome {
    employee_id: String,
    days_closed: usize,
    failures: Vec<AutoCloseFailure>,
}

/// Per-employee closing logic, cloned into each worker task.
struct DayCloser<S> {
    store: Arc<S>,
    writer: Arc<PunchWriter<S>>,
    balances: Arc<BalanceAccumulator<S>>,
    settings: AutoCloseSettings,
}

impl<S> Clone for DayCloser<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            writer: Arc::clone(&self.writer),
            balances: Arc::clone(&self.balances),
            settings: self.settings.clone(),
        }
    }
}

impl<S: TimeStore + 'static> DayCloser<S> {
    async fn close_employee(self, employee_id: String, days: Vec<NaiveDate>) -> EmployeeOutcome {
        let mut outcome = EmployeeOutcome {
            employee_id: employee_id.clone(),
            days_closed: 0,
            failures: Vec::new(),
        };
        for date in days {
            match self.close_day(&employee_id, date).await {
                Ok(true) => outcome.days_closed += 1,
                Ok(false) => {}
                Err(err) => {
                    error!(
                        employee_id = %employee_id,
                        date = %date,
                        error = %err,
                        "Failed to auto-close day"
                    );
                    outcome.failures.push(AutoCloseFailure {
                        employee_id: employee_id.clone(),
                        date,
                        error: err.to_string(),
                    });
                }
            }
        }
        outcome
    }

    /// Closes one day; returns whether anything was written.
    async fn close_day(&self, employee_id: &str, date: NaiveDate) -> EngineResult<bool> {
        let guard = self.balances.lock_employee(employee_id).await;

        let employee = self
            .store
            .employee(employee_id)
            .await?
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })?;
        let punches = self.store.punches_on(employee_id, date).await?;
        let Some(last) = punches.last().cloned() else {
            return Ok(false);
        };

        let before = self.balances.compute_daily_delta(employee_id, date).await?;
        let close_at = date.and_time(self.settings.cutoff).max(last.timestamp);
        let action = plan_close(last.slot, employee.is_percentage_based());
        debug!(
            employee_id,
            date = %date,
            last_slot = last.slot.ordinal(),
            ?action,
            "Planned auto-close"
        );

        let changed = match action {
            CloseAction::Nothing => false,
            CloseAction::AppendDayEnd => self.append(employee_id, close_at, PunchSlot::DayEnd).await?,
            CloseAction::AppendBreakEndThenDayEnd => {
                let break_end = self.append(employee_id, close_at, PunchSlot::BreakEnd).await?;
                let day_end = self.append(employee_id, close_at, PunchSlot::DayEnd).await?;
                break_end || day_end
            }
            CloseAction::RelabelAsDayEnd => {
                if self.has_day_end(employee_id, date).await? {
                    false
                } else {
                    self.writer
                        .relabel_punch(
                            &last,
                            PunchSlot::DayEnd,
                            close_at,
                            Some(AUTO_CLOSE_NOTE.to_string()),
                        )
                        .await?
                        .created
                }
            }
        };

        if changed {
            let after = self.balances.compute_daily_delta(employee_id, date).await?;
            if let Err(err) = self
                .balances
                .apply_incremental_locked(&guard, date, before, after)
                .await
            {
                // The day is closed now, so later passes will not revisit it.
                error!(
                    employee_id,
                    date = %date,
                    old_delta = before,
                    new_delta = after,
                    error = %err,
                    "Auto-closed day but balance update failed; balance needs a rebuild"
                );
                return Err(err);
            }
            info!(
                employee_id,
                date = %date,
                ?action,
                delta_change = after - before,
                "Auto-closed day"
            );
        }
        Ok(changed)
    }

    async fn has_day_end(&self, employee_id: &str, date: NaiveDate) -> EngineResult<bool> {
        Ok(self
            .store
            .find_punch(employee_id, date, PunchSlot::DayEnd)
            .await?
            .is_some())
    }

    async fn append(
        &self,
        employee_id: &str,
        at: NaiveDateTime,
        slot: PunchSlot,
    ) -> EngineResult<bool> {
        if self
            .store
            .find_punch(employee_id, at.date(), slot)
            .await?
            .is_some()
        {
            return Ok(false);
        }
        let punch = NewPunch::new(employee_id, at, slot, PunchSource::SystemAutoClose)
            .with_note(AUTO_CLOSE_NOTE);
        Ok(self.writer.create_punch(punch).await?.created)
    }
}

struct RunningFlag<'a>(&'a AtomicBool);

impl Drop for RunningFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Runs auto-close passes.
///
/// At most one pass runs per closer at a time. Several closers sharing one
/// store and one [`BalanceAccumulator`] may run concurrently; slot
/// uniqueness in the store keeps them from writing duplicate punches.
pub struct AutoCloser<S> {
    closer: DayCloser<S>,
    running: AtomicBool,
}

impl<S: TimeStore + 'static> AutoCloser<S> {
    /// Creates a closer.
    pub fn new(
        store: Arc<S>,
        balances: Arc<BalanceAccumulator<S>>,
        settings: AutoCloseSettings,
    ) -> Self {
        let writer = Arc::new(PunchWriter::new(Arc::clone(&store), settings.clone()));
        Self {
            closer: DayCloser {
                store,
                writer,
                balances,
                settings,
            },
            running: AtomicBool::new(false),
        }
    }

    /// Current state.
    pub fn state(&self) -> AutoCloserState {
        if self.running.load(Ordering::SeqCst) {
            AutoCloserState::Running
        } else {
            AutoCloserState::Idle
        }
    }

    /// The configured cutoff on a given day.
    pub fn cutoff_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.closer.settings.cutoff)
    }

    /// Closes every open day up to `cutoff`.
    ///
    /// Fails only if a pass is already running on this closer or the open
    /// days cannot be listed. Per-day failures are collected in the report
    /// and do not stop other employees.
    pub async fn run_pass(&self, cutoff: NaiveDateTime) -> EngineResult<AutoCloseReport> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!(cutoff = %cutoff, "Auto-close pass already running");
            return Err(EngineError::AutoCloseInProgress);
        }
        let _running = RunningFlag(&self.running);

        let mut report = AutoCloseReport::new(cutoff);
        info!(run_id = %report.run_id, cutoff = %cutoff, "Starting auto-close pass");

        let mut by_employee: BTreeMap<String, Vec<NaiveDate>> = BTreeMap::new();
        for day in self.closer.store.open_days(cutoff).await? {
            by_employee.entry(day.employee_id).or_default().push(day.date);
        }

        let workers = self.closer.settings.workers.max(1);
        let mut tasks = JoinSet::new();
        let mut pending: BTreeMap<String, Vec<NaiveDate>> = BTreeMap::new();
        for (employee_id, mut days) in by_employee {
            if tasks.len() >= workers {
                if let Some(joined) = tasks.join_next().await {
                    Self::collect(&mut report, &mut pending, joined);
                }
            }
            days.sort();
            pending.insert(employee_id.clone(), days.clone());
            let closer = self.closer.clone();
            tasks.spawn(closer.close_employee(employee_id, days));
        }
        while let Some(joined) = tasks.join_next().await {
            Self::collect(&mut report, &mut pending, joined);
        }

        // Workers that never reported back panicked or were cancelled.
        for (employee_id, days) in pending {
            for date in days {
                report.failures.push(AutoCloseFailure {
                    employee_id: employee_id.clone(),
                    date,
                    error: "auto-close worker aborted".to_string(),
                });
            }
        }

        info!(
            run_id = %report.run_id,
            employees_closed = report.employees_closed,
            days_closed = report.days_closed,
            failures = report.failures.len(),
            "Finished auto-close pass"
        );
        Ok(report)
    }

    fn collect(
        report: &mut AutoCloseReport,
        pending: &mut BTreeMap<String, Vec<NaiveDate>>,
        joined: Result<EmployeeOutcome, tokio::task::JoinError>,
    ) {
        match joined {
            Ok(outcome) => {
                pending.remove(&outcome.employee_id);
                if outcome.days_closed > 0 {
                    report.employees_closed += 1;
                }
                report.days_closed += outcome.days_closed;
                report.failures.extend(outcome.failures);
            }
            Err(err) => {
                error!(run_id = %report.run_id, error = %err, "Auto-close worker aborted");
            }
        }
    }
}
