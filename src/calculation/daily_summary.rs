//! Daily summary construction from punch events.
//!
//! Walks one day's punches in timestamp order, pairing each START with the
//! next END. Irregular sequences are flagged on the summary rather than
//! rejected, since correcting them is a human workflow.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::models::{DailySummary, PunchAnomaly, PunchEvent, PunchKind, PunchSource};

/// Builds the [`DailySummary`] for one employee and date.
///
/// Punches belonging to another employee or another date are skipped.
/// Events are sorted by timestamp before the walk, so callers may pass them
/// in storage order.
///
/// # Behavior
///
/// - START while a START is open: flagged as [`PunchAnomaly::DuplicateStart`],
///   the earlier START stays open
/// - END with no open START: flagged as [`PunchAnomaly::UnmatchedEnd`]
/// - The gap between an END and the next START counts as break time
/// - `open` is true iff the walk ends on an unmatched START
/// - `needs_correction` is true if any punch was auto-closed or any anomaly
///   occurred
///
/// # Example
///
/// ```
/// use worktime_engine::calculation::build_daily_summary;
/// use worktime_engine::models::{NewPunch, PunchSlot, PunchSource};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
/// let at = |h, m| date.and_hms_opt(h, m, 0).unwrap();
/// let punches = vec![
///     NewPunch::new("emp_001", at(9, 0), PunchSlot::DayStart, PunchSource::Hardware).into_event(),
///     NewPunch::new("emp_001", at(12, 0), PunchSlot::BreakStart, PunchSource::Hardware).into_event(),
///     NewPunch::new("emp_001", at(13, 0), PunchSlot::BreakEnd, PunchSource::Hardware).into_event(),
///     NewPunch::new("emp_001", at(17, 0), PunchSlot::DayEnd, PunchSource::Hardware).into_event(),
/// ];
///
/// let summary = build_daily_summary("emp_001", date, &punches);
/// assert_eq!(summary.worked_minutes, 420);
/// assert_eq!(summary.break_minutes, 60);
/// assert!(!summary.open);
/// ```
pub fn build_daily_summary(
    employee_id: &str,
    date: NaiveDate,
    punches: &[PunchEvent],
) -> DailySummary {
    let mut events: Vec<&PunchEvent> = punches
        .iter()
        .filter(|punch| {
            let belongs = punch.employee_id == employee_id && punch.date() == date;
            if !belongs {
                warn!(
                    employee_id,
                    date = %date,
                    punch_id = %punch.id,
                    "Skipping punch outside the summarized day"
                );
            }
            belongs
        })
        .collect();
    events.sort_by_key(|punch| punch.timestamp);

    let mut summary = DailySummary::empty(employee_id, date);
    summary.punch_count = events.len();

    let mut open_start: Option<NaiveDateTime> = None;
    let mut last_end: Option<NaiveDateTime> = None;

    for punch in &events {
        if punch.source == PunchSource::SystemAutoClose {
            summary.needs_correction = true;
        }

        match punch.kind {
            PunchKind::Start => {
                if open_start.is_some() {
                    summary
                        .anomalies
                        .push(PunchAnomaly::DuplicateStart { at: punch.timestamp });
                    continue;
                }
                if let Some(end) = last_end {
                    summary.break_minutes += (punch.timestamp - end).num_minutes();
                }
                summary.first_start.get_or_insert(punch.timestamp);
                open_start = Some(punch.timestamp);
            }
            PunchKind::End => match open_start.take() {
                Some(start) => {
                    summary.worked_minutes += (punch.timestamp - start).num_minutes();
                    last_end = Some(punch.timestamp);
                }
                None => {
                    summary
                        .anomalies
                        .push(PunchAnomaly::UnmatchedEnd { at: punch.timestamp });
                }
            },
        }
    }

    summary.last_end = last_end;
    summary.open = open_start.is_some();
    if !summary.anomalies.is_empty() {
        summary.needs_correction = true;
        warn!(
            employee_id,
            date = %date,
            anomalies = summary.anomalies.len(),
            "Punch sequence needs correction"
        );
    }

    summary
}
