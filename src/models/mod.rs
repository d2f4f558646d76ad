//! Core data models for the work-time engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calendar;
mod daily_summary;
mod employee;
mod punch;
mod schedule_rule;

pub use calendar::{
    Absence, AbsenceKind, CompanyClosure, DayPortion, HolidayDeduction, HolidayElection,
    PublicHoliday,
};
pub use daily_summary::{DailySummary, PunchAnomaly};
pub use employee::{Employee, ScheduleConfig, WeekHours};
pub use punch::{NewPunch, PunchEvent, PunchKind, PunchSlot, PunchSource};
pub use schedule_rule::{RuleMatch, RuleMode, RuleRecurrence, ScheduleOverrideRule};
