//! Storage collaborator interface.
//!
//! The engine never talks to a database directly. Everything it reads or
//! writes goes through [`TimeStore`], which a persistence layer implements.
//! [`MemoryStore`] is a complete in-process implementation.

mod memory;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;
use uuid::Uuid;

use crate::calculation::EmployeeCalendar;
use crate::models::{Employee, NewPunch, PunchEvent, PunchSlot, PunchSource, ScheduleOverrideRule};

pub use memory::MemoryStore;

/// Errors reported by a [`TimeStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A lock wait timed out or a deadlock was detected; the write may be retried.
    #[error("Lock conflict: {message}")]
    LockConflict {
        /// Backend message.
        message: String,
    },

    /// The (employee, date, slot) key is already taken.
    #[error("Punch slot {slot} already taken for employee '{employee_id}' on {date}")]
    UniqueViolation {
        /// The employee.
        employee_id: String,
        /// The calendar day.
        date: NaiveDate,
        /// The slot ordinal.
        slot: u8,
    },

    /// No employee exists with the given identifier.
    #[error("Employee not found: {employee_id}")]
    NotFound {
        /// The missing identifier.
        employee_id: String,
    },

    /// No punch exists with the given identifier.
    #[error("Punch not found: {punch_id}")]
    PunchNotFound {
        /// The missing identifier.
        punch_id: Uuid,
    },

    /// Any other backend failure.
    #[error("Store backend error: {message}")]
    Backend {
        /// Backend message.
        message: String,
    },
}

/// A day with punches but no day-end punch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpenDay {
    /// The employee.
    pub employee_id: String,
    /// The calendar day.
    pub date: NaiveDate,
}

/// Persistence operations the engine depends on.
///
/// Each write is expected to run in its own transaction at the strongest
/// isolation the backend offers.
#[async_trait]
pub trait TimeStore: Send + Sync {
    /// Looks up an employee.
    async fn employee(&self, employee_id: &str) -> Result<Option<Employee>, StoreError>;

    /// Returns the employee's schedule override rules.
    async fn override_rules(
        &self,
        employee_id: &str,
    ) -> Result<Vec<ScheduleOverrideRule>, StoreError>;

    /// Returns the employee's absences, holiday elections and the company closures.
    async fn employee_calendar(&self, employee_id: &str) -> Result<EmployeeCalendar, StoreError>;

    /// Returns one day's punches ordered by timestamp.
    async fn punches_on(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<PunchEvent>, StoreError>;

    /// Returns every date on which the employee has punches, ascending.
    async fn punch_dates(&self, employee_id: &str) -> Result<Vec<NaiveDate>, StoreError>;

    /// Returns days up to `before` that have punches, no day-end punch and
    /// no punch at or after `before`.
    async fn open_days(&self, before: NaiveDateTime) -> Result<Vec<OpenDay>, StoreError>;

    /// Inserts a punch, failing with [`StoreError::UniqueViolation`] if the
    /// (employee, date, slot) key is taken.
    async fn insert_punch(&self, punch: NewPunch) -> Result<PunchEvent, StoreError>;

    /// Finds the punch occupying a slot.
    async fn find_punch(
        &self,
        employee_id: &str,
        date: NaiveDate,
        slot: PunchSlot,
    ) -> Result<Option<PunchEvent>, StoreError>;

    /// Moves a punch to another slot and time on the same day, retagging its
    /// source and marking it corrected.
    async fn relabel_punch(
        &self,
        punch_id: Uuid,
        slot: PunchSlot,
        timestamp: NaiveDateTime,
        source: PunchSource,
        note: Option<String>,
    ) -> Result<PunchEvent, StoreError>;

    /// Replaces the stored balance.
    async fn replace_balance(&self, employee_id: &str, minutes: i64) -> Result<(), StoreError>;

    /// Adds `delta` to the stored balance and returns the new total.
    async fn adjust_balance(&self, employee_id: &str, delta: i64) -> Result<i64, StoreError>;
}
