//! In-process [`TimeStore`] implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::calculation::EmployeeCalendar;
use crate::models::{
    Absence, CompanyClosure, Employee, HolidayElection, NewPunch, PunchEvent, PunchSlot,
    PunchSource, ScheduleOverrideRule,
};

use super::{OpenDay, StoreError, TimeStore};

type DayKey = (String, NaiveDate);

#[derive(Debug, Default)]
struct Inner {
    employees: HashMap<String, Employee>,
    rules: Vec<ScheduleOverrideRule>,
    punches: BTreeMap<DayKey, Vec<PunchEvent>>,
    absences: Vec<Absence>,
    elections: Vec<HolidayElection>,
    closures: Vec<CompanyClosure>,
}

/// A [`TimeStore`] held entirely in memory.
///
/// Every write runs under one mutex, which makes each call serializable.
/// Lock conflicts can be injected to exercise callers' retry paths.
///
/// # Example
///
/// ```
/// use worktime_engine::models::Employee;
/// use worktime_engine::store::MemoryStore;
///
/// let store = MemoryStore::new();
/// store.upsert_employee(Employee::new("emp_001", "BY"));
/// assert_eq!(store.balance_of("emp_001"), Some(0));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    injected_conflicts: AtomicUsize,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an employee.
    pub fn upsert_employee(&self, employee: Employee) {
        self.inner
            .lock()
            .employees
            .insert(employee.id.clone(), employee);
    }

    /// Adds a schedule override rule.
    pub fn add_rule(&self, rule: ScheduleOverrideRule) {
        self.inner.lock().rules.push(rule);
    }

    /// Adds an approved absence.
    pub fn add_absence(&self, absence: Absence) {
        self.inner.lock().absences.push(absence);
    }

    /// Records a holiday election, replacing any earlier one for the same date.
    pub fn set_holiday_election(&self, election: HolidayElection) {
        let mut inner = self.inner.lock();
        inner
            .elections
            .retain(|e| !(e.employee_id == election.employee_id && e.date == election.date));
        inner.elections.push(election);
    }

    /// Adds a company-wide closure day.
    pub fn add_closure(&self, closure: CompanyClosure) {
        self.inner.lock().closures.push(closure);
    }

    /// Returns the stored balance of an employee.
    pub fn balance_of(&self, employee_id: &str) -> Option<i64> {
        self.inner
            .lock()
            .employees
            .get(employee_id)
            .map(|employee| employee.balance_minutes)
    }

    /// Makes the next `count` punch writes fail with [`StoreError::LockConflict`].
    pub fn inject_lock_conflicts(&self, count: usize) {
        self.injected_conflicts.store(count, Ordering::SeqCst);
    }

    /// Writes a punch synchronously, enforcing slot uniqueness.
    pub fn record_punch(&self, punch: NewPunch) -> Result<PunchEvent, StoreError> {
        self.take_injected_conflict()?;

        let mut inner = self.inner.lock();
        let date = punch.date();
        let day = inner
            .punches
            .entry((punch.employee_id.clone(), date))
            .or_default();
        if day.iter().any(|existing| existing.slot == punch.slot) {
            return Err(StoreError::UniqueViolation {
                employee_id: punch.employee_id,
                date,
                slot: punch.slot.ordinal(),
            });
        }

        let event = punch.into_event();
        day.push(event.clone());
        day.sort_by_key(|p| p.timestamp);
        Ok(event)
    }

    fn take_injected_conflict(&self) -> Result<(), StoreError> {
        let taken = self
            .injected_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        match taken {
            Ok(_) => Err(StoreError::LockConflict {
                message: "deadlock detected".to_string(),
            }),
            Err(_) => Ok(()),
        }
    }

    fn relabel(
        &self,
        punch_id: Uuid,
        slot: PunchSlot,
        timestamp: NaiveDateTime,
        source: PunchSource,
        note: Option<String>,
    ) -> Result<PunchEvent, StoreError> {
        self.take_injected_conflict()?;

        let mut inner = self.inner.lock();
        let day = inner
            .punches
            .values_mut()
            .find(|day| day.iter().any(|p| p.id == punch_id))
            .ok_or(StoreError::PunchNotFound { punch_id })?;

        if day.iter().any(|p| p.slot == slot && p.id != punch_id) {
            let (employee_id, date) = day
                .iter()
                .find(|p| p.id == punch_id)
                .map(|p| (p.employee_id.clone(), p.date()))
                .ok_or(StoreError::PunchNotFound { punch_id })?;
            return Err(StoreError::UniqueViolation {
                employee_id,
                date,
                slot: slot.ordinal(),
            });
        }

        let index = day
            .iter()
            .position(|p| p.id == punch_id)
            .ok_or(StoreError::PunchNotFound { punch_id })?;
        if timestamp.date() != day[index].date() {
            return Err(StoreError::Backend {
                message: format!("cannot move punch {punch_id} to another day"),
            });
        }

        let punch = &mut day[index];
        punch.slot = slot;
        punch.kind = slot.kind();
        punch.timestamp = timestamp;
        punch.source = source;
        punch.corrected = true;
        if note.is_some() {
            punch.note = note;
        }
        let relabeled = punch.clone();
        day.sort_by_key(|p| p.timestamp);
        Ok(relabeled)
    }

    fn open_days_before(&self, before: NaiveDateTime) -> Vec<OpenDay> {
        let inner = self.inner.lock();
        inner
            .punches
            .iter()
            .filter(|((_, date), punches)| {
                *date <= before.date()
                    && !punches.is_empty()
                    && punches.iter().all(|p| p.slot != PunchSlot::DayEnd)
                    && punches.iter().all(|p| p.timestamp < before)
            })
            .map(|((employee_id, date), _)| OpenDay {
                employee_id: employee_id.clone(),
                date: *date,
            })
            .collect()
    }

    fn with_employee<T>(
        &self,
        employee_id: &str,
        f: impl FnOnce(&mut Employee) -> T,
    ) -> Result<T, StoreError> {
        let mut inner = self.inner.lock();
        let employee = inner
            .employees
            .get_mut(employee_id)
            .ok_or_else(|| StoreError::NotFound {
                employee_id: employee_id.to_string(),
            })?;
        Ok(f(employee))
    }
}

#[async_trait]
impl TimeStore for MemoryStore {
    async fn employee(&self, employee_id: &str) -> Result<Option<Employee>, StoreError> {
        Ok(self.inner.lock().employees.get(employee_id).cloned())
    }

    async fn override_rules(
        &self,
        employee_id: &str,
    ) -> Result<Vec<ScheduleOverrideRule>, StoreError> {
        Ok(self
            .inner
            .lock()
            .rules
            .iter()
            .filter(|rule| rule.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn employee_calendar(&self, employee_id: &str) -> Result<EmployeeCalendar, StoreError> {
        let inner = self.inner.lock();
        Ok(EmployeeCalendar {
            absences: inner
                .absences
                .iter()
                .filter(|a| a.employee_id == employee_id)
                .cloned()
                .collect(),
            elections: inner
                .elections
                .iter()
                .filter(|e| e.employee_id == employee_id)
                .cloned()
                .collect(),
            closures: inner.closures.clone(),
        })
    }

    async fn punches_on(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<PunchEvent>, StoreError> {
        Ok(self
            .inner
            .lock()
            .punches
            .get(&(employee_id.to_string(), date))
            .cloned()
            .unwrap_or_default())
    }

    async fn punch_dates(&self, employee_id: &str) -> Result<Vec<NaiveDate>, StoreError> {
        Ok(self
            .inner
            .lock()
            .punches
            .iter()
            .filter(|((id, _), punches)| id == employee_id && !punches.is_empty())
            .map(|((_, date), _)| *date)
            .collect())
    }

    async fn open_days(&self, before: NaiveDateTime) -> Result<Vec<OpenDay>, StoreError> {
        Ok(self.open_days_before(before))
    }

    async fn insert_punch(&self, punch: NewPunch) -> Result<PunchEvent, StoreError> {
        self.record_punch(punch)
    }

    async fn find_punch(
        &self,
        employee_id: &str,
        date: NaiveDate,
        slot: PunchSlot,
    ) -> Result<Option<PunchEvent>, StoreError> {
        Ok(self
            .inner
            .lock()
            .punches
            .get(&(employee_id.to_string(), date))
            .and_then(|day| day.iter().find(|p| p.slot == slot).cloned()))
    }

    async fn relabel_punch(
        &self,
        punch_id: Uuid,
        slot: PunchSlot,
        timestamp: NaiveDateTime,
        source: PunchSource,
        note: Option<String>,
    ) -> Result<PunchEvent, StoreError> {
        self.relabel(punch_id, slot, timestamp, source, note)
    }

    async fn replace_balance(&self, employee_id: &str, minutes: i64) -> Result<(), StoreError> {
        self.with_employee(employee_id, |employee| employee.balance_minutes = minutes)
    }

    async fn adjust_balance(&self, employee_id: &str, delta: i64) -> Result<i64, StoreError> {
        self.with_employee(employee_id, |employee| {
            employee.balance_minutes += delta;
            employee.balance_minutes
        })
    }
}
