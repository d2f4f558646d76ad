//! Per-employee schedule override rules.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// How a rule repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleRecurrence {
    /// Matches every `repeat_interval_days` days from the start date.
    Recurring,
    /// Matches the start date only.
    SingleShot,
}

/// Effect of a matching rule on expected minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleMode {
    /// The day is off: zero expected minutes.
    Off,
    /// Half of the otherwise-computed base.
    HalfDay,
    /// The rule matches but leaves the base unchanged.
    Normal,
}

/// A schedule override belonging to one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleOverrideRule {
    /// Rule identifier; breaks ties between rules starting the same day.
    pub id: u64,
    /// Owning employee.
    pub employee_id: String,
    /// Recurring or single-shot.
    pub recurrence: RuleRecurrence,
    /// First day the rule can match.
    pub start_date: NaiveDate,
    /// Last day the rule can match, inclusive.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Days between occurrences for recurring rules.
    #[serde(default)]
    pub repeat_interval_days: Option<u32>,
    /// Weekday the date must fall on, if any.
    #[serde(default)]
    pub weekday: Option<Weekday>,
    /// Effect on expected minutes.
    pub mode: RuleMode,
}

/// Outcome of testing a rule against a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleMatch {
    /// The rule applies.
    Matches,
    /// The rule does not apply.
    NoMatch,
    /// The rule is malformed and was skipped.
    Invalid(String),
}

impl ScheduleOverrideRule {
    /// Tests the rule against a date.
    ///
    /// # Example
    ///
    /// ```
    /// use worktime_engine::models::{RuleMatch, RuleMode, RuleRecurrence, ScheduleOverrideRule};
    /// use chrono::{NaiveDate, Weekday};
    ///
    /// // Every other Friday off, starting 2026-01-02.
    /// let rule = ScheduleOverrideRule {
    ///     id: 1,
    ///     employee_id: "emp_001".to_string(),
    ///     recurrence: RuleRecurrence::Recurring,
    ///     start_date: NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
    ///     end_date: None,
    ///     repeat_interval_days: Some(14),
    ///     weekday: Some(Weekday::Fri),
    ///     mode: RuleMode::Off,
    /// };
    /// assert_eq!(rule.matches(NaiveDate::from_ymd_opt(2026, 1, 16).unwrap()), RuleMatch::Matches);
    /// assert_eq!(rule.matches(NaiveDate::from_ymd_opt(2026, 1, 9).unwrap()), RuleMatch::NoMatch);
    /// ```
    pub fn matches(&self, date: NaiveDate) -> RuleMatch {
        if date < self.start_date || self.end_date.is_some_and(|end| date > end) {
            return RuleMatch::NoMatch;
        }
        if self.weekday.is_some_and(|weekday| weekday != date.weekday()) {
            return RuleMatch::NoMatch;
        }

        match self.recurrence {
            RuleRecurrence::SingleShot => {
                if date == self.start_date {
                    RuleMatch::Matches
                } else {
                    RuleMatch::NoMatch
                }
            }
            RuleRecurrence::Recurring => match self.repeat_interval_days {
                Some(interval) if interval > 0 => {
                    let days_since_start = (date - self.start_date).num_days();
                    if days_since_start % i64::from(interval) == 0 {
                        RuleMatch::Matches
                    } else {
                        RuleMatch::NoMatch
                    }
                }
                _ => RuleMatch::Invalid(format!(
                    "rule {} is recurring without a positive repeat interval",
                    self.id
                )),
            },
        }
    }
}
