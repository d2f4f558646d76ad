//! Day-level exceptions consumed by the schedule resolver.
//!
//! The [`ExceptionCalendar`] folds public holidays, holiday elections,
//! approved absences and company closures into one [`DayExceptions`] value
//! per employee and date.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{
    Absence, AbsenceKind, CompanyClosure, DayPortion, Employee, HolidayDeduction,
    HolidayElection, PublicHoliday,
};

use super::holidays::HolidayCache;

/// An absence as it applies to one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceDay {
    /// Vacation or sick leave.
    pub kind: AbsenceKind,
    /// Portion of the day covered.
    pub portion: DayPortion,
}

/// Everything that can override a normal working day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayExceptions {
    /// The regional public holiday on this date, if any.
    pub holiday: Option<PublicHoliday>,
    /// The employee's election for that holiday.
    pub holiday_deduction: HolidayDeduction,
    /// An approved absence covering the date.
    pub absence: Option<AbsenceDay>,
    /// True if the date is a company-wide vacation day.
    pub company_closure: bool,
    /// True if the employee has punches on the date.
    pub has_punches: bool,
}

impl DayExceptions {
    /// A plain working day with no overrides.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Per-employee calendar entries, loaded once and queried per date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeCalendar {
    /// Approved absences.
    pub absences: Vec<Absence>,
    /// Holiday elections.
    pub elections: Vec<HolidayElection>,
    /// Company-wide closures.
    pub closures: Vec<CompanyClosure>,
}

impl EmployeeCalendar {
    /// Every date carrying an explicit exception for this employee.
    pub fn exception_dates(&self) -> BTreeSet<NaiveDate> {
        let mut dates: BTreeSet<NaiveDate> =
            self.absences.iter().flat_map(|absence| absence.dates()).collect();
        dates.extend(self.elections.iter().map(|election| election.date));
        dates.extend(self.closures.iter().map(|closure| closure.date));
        dates
    }

    fn absence_on(&self, date: NaiveDate) -> Option<AbsenceDay> {
        let covering = self.absences.iter().filter(|absence| absence.covers(date));
        // A full-day entry outranks a half-day one on the same date.
        covering
            .map(|absence| AbsenceDay {
                kind: absence.kind,
                portion: absence.portion,
            })
            .min_by_key(|day| match day.portion {
                DayPortion::Full => 0,
                DayPortion::Half => 1,
            })
    }

    fn election_on(&self, date: NaiveDate) -> HolidayDeduction {
        self.elections
            .iter()
            .find(|election| election.date == date)
            .map(|election| election.deduction)
            .unwrap_or_default()
    }
}

/// Builds [`DayExceptions`] from the holiday cache and employee entries.
#[derive(Debug, Clone)]
pub struct ExceptionCalendar {
    holidays: Arc<HolidayCache>,
}

impl ExceptionCalendar {
    /// Creates a calendar backed by the given holiday cache.
    pub fn new(holidays: Arc<HolidayCache>) -> Self {
        Self { holidays }
    }

    /// Returns the shared holiday cache.
    pub fn holiday_cache(&self) -> &Arc<HolidayCache> {
        &self.holidays
    }

    /// Collects the exceptions for one employee and date.
    pub fn day_exceptions(
        &self,
        employee: &Employee,
        calendar: &EmployeeCalendar,
        date: NaiveDate,
        has_punches: bool,
    ) -> DayExceptions {
        let holiday = self.holidays.holiday_on(date, &employee.region);
        let holiday_deduction = if holiday.is_some() {
            calendar.election_on(date)
        } else {
            HolidayDeduction::default()
        };

        DayExceptions {
            holiday,
            holiday_deduction,
            absence: calendar.absence_on(date),
            company_closure: calendar.closures.iter().any(|closure| closure.date == date),
            has_punches,
        }
    }
}
