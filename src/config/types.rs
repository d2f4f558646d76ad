//! Configuration types for the work-time engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::time::Duration;

use chrono::{NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Schedule defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    /// Daily hours for employees without their own configuration.
    pub default_daily_hours: Decimal,
    /// Days treated as off unless a weekly cycle lists hours for them.
    pub weekend_days: Vec<Weekday>,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            default_daily_hours: Decimal::new(85, 1),
            weekend_days: vec![Weekday::Sat, Weekday::Sun],
        }
    }
}

/// Auto-close pass settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AutoCloseSettings {
    /// Local time of day at which open sessions are closed.
    pub cutoff: NaiveTime,
    /// Attempts per punch write before giving up on lock conflicts.
    pub max_attempts: u32,
    /// Backoff unit; attempt `n` waits `n * backoff_base_ms`.
    pub backoff_base_ms: u64,
    /// Employees processed concurrently.
    pub workers: usize,
}

impl AutoCloseSettings {
    /// Returns the wait before retrying after the given failed attempt.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.backoff_base_ms.saturating_mul(u64::from(attempt)))
    }
}

impl Default for AutoCloseSettings {
    fn default() -> Self {
        Self {
            cutoff: NaiveTime::from_hms_opt(23, 20, 0).unwrap_or(NaiveTime::MIN),
            max_attempts: 3,
            backoff_base_ms: 50,
            workers: 4,
        }
    }
}

/// How a holiday's date is determined each year.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum HolidayDate {
    /// Same month and day every year.
    Fixed {
        /// Month, 1-12.
        month: u32,
        /// Day of month.
        day: u32,
    },
    /// Offset in days from Western Easter Sunday.
    EasterOffset {
        /// Days after (positive) or before (negative) Easter Sunday.
        days: i64,
    },
}

/// A public holiday rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HolidayRule {
    /// The name of the holiday.
    pub name: String,
    /// How the date is computed.
    pub date: HolidayDate,
    /// Region codes observing the holiday; empty means all regions.
    #[serde(default)]
    pub regions: Vec<String>,
}

impl HolidayRule {
    /// Returns true if the rule applies to the region.
    pub fn applies_to(&self, region: &str) -> bool {
        self.regions.is_empty() || self.regions.iter().any(|r| r.eq_ignore_ascii_case(region))
    }
}

/// Holidays configuration file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HolidaysConfig {
    /// The holiday rules.
    #[serde(default)]
    pub holidays: Vec<HolidayRule>,
}

/// Engine configuration file structure (`engine.yaml`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineSettings {
    /// Schedule defaults.
    #[serde(default)]
    pub schedule: ScheduleSettings,
    /// Auto-close settings.
    #[serde(default)]
    pub auto_close: AutoCloseSettings,
}

/// The complete engine configuration.
///
/// # Example
///
/// ```
/// use worktime_engine::config::EngineConfig;
/// use rust_decimal::Decimal;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.schedule().default_daily_hours, Decimal::new(85, 1));
/// assert_eq!(config.auto_close().max_attempts, 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    settings: EngineSettings,
    holidays: Vec<HolidayRule>,
}

impl EngineConfig {
    /// Creates a configuration from its component parts.
    pub fn new(settings: EngineSettings, holidays: Vec<HolidayRule>) -> Self {
        Self { settings, holidays }
    }

    /// Returns the schedule defaults.
    pub fn schedule(&self) -> &ScheduleSettings {
        &self.settings.schedule
    }

    /// Returns the auto-close settings.
    pub fn auto_close(&self) -> &AutoCloseSettings {
        &self.settings.auto_close
    }

    /// Returns the holiday rules.
    pub fn holidays(&self) -> &[HolidayRule] {
        &self.holidays
    }

    /// Replaces the holiday rules.
    pub fn with_holidays(mut self, holidays: Vec<HolidayRule>) -> Self {
        self.holidays = holidays;
        self
    }

    /// Replaces the auto-close settings.
    pub fn with_auto_close(mut self, auto_close: AutoCloseSettings) -> Self {
        self.settings.auto_close = auto_close;
        self
    }
}
