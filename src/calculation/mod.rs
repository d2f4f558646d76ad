//! Calculation logic for the work-time engine.
//!
//! This module contains the pure computations: regional holiday lookup,
//! day-level exception collection, expected-minute resolution and daily
//! punch summaries. None of it performs I/O.

mod daily_summary;
mod exceptions;
mod holidays;
mod schedule_resolver;

pub use daily_summary::build_daily_summary;
pub use exceptions::{AbsenceDay, DayExceptions, EmployeeCalendar, ExceptionCalendar};
pub use holidays::{HolidayCache, HolidayProvider, RuleHolidayProvider, easter_sunday};
pub use schedule_resolver::{
    ExpectedAdjustment, ExpectedDay, ScheduleResolver, weeks_since_epoch,
};
