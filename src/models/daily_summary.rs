//! Daily summary of punch activity.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// An irregularity found while pairing punches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum PunchAnomaly {
    /// A START arrived while another START was still open.
    DuplicateStart {
        /// Timestamp of the ignored START.
        at: NaiveDateTime,
    },
    /// An END arrived with no open START.
    UnmatchedEnd {
        /// Timestamp of the ignored END.
        at: NaiveDateTime,
    },
}

/// Derived summary of one employee's punches on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    /// The employee.
    pub employee_id: String,
    /// The calendar day.
    pub date: NaiveDate,
    /// Sum of matched START..END intervals.
    pub worked_minutes: i64,
    /// Sum of gaps between an END and the next START.
    pub break_minutes: i64,
    /// First START of the day.
    pub first_start: Option<NaiveDateTime>,
    /// Last END of the day.
    pub last_end: Option<NaiveDateTime>,
    /// True iff the day ends on an unmatched START.
    pub open: bool,
    /// True if a punch was auto-closed or an anomaly occurred.
    pub needs_correction: bool,
    /// Number of punches considered.
    pub punch_count: usize,
    /// Irregularities, in order of occurrence.
    pub anomalies: Vec<PunchAnomaly>,
}

impl DailySummary {
    /// An all-zero summary for a day without punches.
    pub fn empty(employee_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            employee_id: employee_id.into(),
            date,
            worked_minutes: 0,
            break_minutes: 0,
            first_start: None,
            last_end: None,
            open: false,
            needs_correction: false,
            punch_count: 0,
            anomalies: Vec::new(),
        }
    }
}
