//! Calendar entries that override a normal working day.
//!
//! This module contains public holidays, per-employee holiday elections,
//! approved absences and company-wide closures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A public holiday in one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicHoliday {
    /// The date of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday (e.g. "Whit Monday").
    pub name: String,
    /// The region the lookup was made for.
    pub region: String,
}

/// Whether a public holiday is deducted from an employee's expected time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayDeduction {
    /// No decision recorded yet; treated as [`HolidayDeduction::Deduct`].
    #[default]
    Pending,
    /// The holiday zeroes expected minutes.
    Deduct,
    /// The holiday is worked as a normal day.
    DoNotDeduct,
}

impl HolidayDeduction {
    /// Returns true if the holiday should zero expected minutes.
    pub fn deducts(self) -> bool {
        !matches!(self, HolidayDeduction::DoNotDeduct)
    }
}

/// An employee's decision about one public holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayElection {
    /// The employee the election belongs to.
    pub employee_id: String,
    /// The holiday date.
    pub date: NaiveDate,
    /// The decision.
    pub deduction: HolidayDeduction,
}

/// Kind of approved absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceKind {
    /// Approved vacation.
    Vacation,
    /// Sick leave.
    SickLeave,
}

/// How much of a day an entry covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPortion {
    /// The whole day.
    #[default]
    Full,
    /// Half of the day.
    Half,
}

/// An approved absence covering an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Absence {
    /// The absent employee.
    pub employee_id: String,
    /// Vacation or sick leave.
    pub kind: AbsenceKind,
    /// First absent day.
    pub start_date: NaiveDate,
    /// Last absent day, inclusive.
    pub end_date: NaiveDate,
    /// Portion of each day covered.
    #[serde(default)]
    pub portion: DayPortion,
}

impl Absence {
    /// Returns true if the absence covers the date.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Iterates every covered date.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |date| *date <= self.end_date)
    }
}

/// A company-wide vacation day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyClosure {
    /// The closure date.
    pub date: NaiveDate,
    /// Description (e.g. "Christmas shutdown").
    #[serde(default)]
    pub name: String,
}
