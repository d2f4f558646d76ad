//! Employee model and schedule configuration.
//!
//! This module defines the [`Employee`] struct together with the
//! [`ScheduleConfig`] that drives expected-minute resolution.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One week of a rotating schedule: weekday name to hours.
///
/// Keys are kept as raw strings ("monday", "tue", ...) because schedules are
/// edited by administrators; keys that do not name a weekday are reported and
/// ignored by the resolver.
pub type WeekHours = BTreeMap<String, Decimal>;

/// Schedule configuration for an employee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Flat daily hours. Falls back to the engine default when absent.
    #[serde(default)]
    pub daily_hours: Option<Decimal>,
    /// Rotating weekly cycle; week `n` applies when `weeks_since_epoch % len == n`.
    #[serde(default)]
    pub weekly_cycle: Vec<WeekHours>,
    /// Dates before this use the flat daily hours instead of the cycle.
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
}

impl ScheduleConfig {
    /// Returns true if a weekly cycle is configured.
    pub fn has_cycle(&self) -> bool {
        !self.weekly_cycle.is_empty()
    }
}

/// Represents an employee whose work time is reconciled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Schedule configuration.
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Percentage of full time (e.g. 50 for half time). `None` means 100.
    #[serde(default)]
    pub employment_percentage: Option<Decimal>,
    /// Region code used for public holiday lookup (e.g. "BY").
    #[serde(default)]
    pub region: String,
    /// Cumulative overtime/undertime balance in minutes.
    #[serde(default)]
    pub balance_minutes: i64,
}

impl Employee {
    /// Creates an employee with default schedule settings and a zero balance.
    pub fn new(id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            schedule: ScheduleConfig::default(),
            employment_percentage: None,
            region: region.into(),
            balance_minutes: 0,
        }
    }

    /// Returns true if the employee works a fraction of full time.
    ///
    /// # Examples
    ///
    /// ```
    /// use worktime_engine::models::Employee;
    /// use rust_decimal::Decimal;
    ///
    /// let mut employee = Employee::new("emp_001", "BY");
    /// assert!(!employee.is_percentage_based());
    ///
    /// employee.employment_percentage = Some(Decimal::new(50, 0));
    /// assert!(employee.is_percentage_based());
    /// ```
    pub fn is_percentage_based(&self) -> bool {
        self.employment_percentage
            .is_some_and(|pct| pct > Decimal::ZERO && pct < Decimal::ONE_HUNDRED)
    }
}
