//! Expected-minute resolution.
//!
//! [`ScheduleResolver`] turns an employee's schedule configuration, override
//! rules and the day's exceptions into the minutes of work expected on a
//! date. It performs no I/O and never fails: malformed schedule data is
//! logged as [`EngineError::InvalidSchedule`] and replaced by the default.
//!
//! # Resolution order
//!
//! 1. Base hours: flat daily hours before the schedule effective date,
//!    otherwise the rotating weekly cycle (falling back to the flat hours
//!    when the weekday has no entry), otherwise the flat hours.
//! 2. Weekend days are off unless the cycle lists hours for them or a
//!    matching override rule declares the day worked.
//! 3. The matching override rule: `Off` zeroes, `HalfDay` halves.
//! 4. A deducted public holiday zeroes.
//! 5. A company closure zeroes unless the employee punched that day.
//! 6. A full-day absence zeroes, a half-day absence halves.
//! 7. The percentage-of-full-time factor scales the result, which is then
//!    rounded to the nearest minute.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ScheduleSettings;
use crate::error::EngineError;
use crate::models::{
    AbsenceKind, DayPortion, Employee, RuleMatch, RuleMode, ScheduleOverrideRule,
};

use super::exceptions::DayExceptions;

/// A step the resolver applied while computing expected minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ExpectedAdjustment {
    /// Flat daily hours were used.
    FlatHours,
    /// The date precedes the schedule effective date.
    BeforeEffectiveDate,
    /// Hours came from the given cycle week.
    CycleWeek {
        /// Zero-based week index in the cycle.
        index: usize,
    },
    /// The cycle week had no entry for the weekday.
    CycleFallback {
        /// Zero-based week index in the cycle.
        index: usize,
    },
    /// Weekend without an explicit schedule entry.
    Weekend,
    /// An override rule made the day off.
    RuleOff {
        /// The matching rule.
        rule_id: u64,
    },
    /// An override rule halved the day.
    RuleHalfDay {
        /// The matching rule.
        rule_id: u64,
    },
    /// An override rule matched without changing the base.
    RuleNormal {
        /// The matching rule.
        rule_id: u64,
    },
    /// A deducted public holiday.
    PublicHoliday {
        /// Holiday name.
        name: String,
    },
    /// A public holiday the employee elected not to deduct.
    HolidayNotDeducted {
        /// Holiday name.
        name: String,
    },
    /// A company closure without punches.
    CompanyClosure,
    /// A company closure on which the employee punched anyway.
    CompanyClosureWorked,
    /// An approved absence.
    Absence {
        /// Vacation or sick leave.
        kind: AbsenceKind,
        /// Portion of the day.
        portion: DayPortion,
    },
    /// Percentage-of-full-time scaling.
    Percentage {
        /// The factor applied (1.0 = full time).
        factor: Decimal,
    },
}

/// The resolved expectation for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedDay {
    /// The date resolved.
    pub date: NaiveDate,
    /// Expected minutes, never negative.
    pub minutes: i64,
    /// Hours from the schedule before any overlay.
    pub base_hours: Decimal,
    /// Steps applied, in order.
    pub adjustments: Vec<ExpectedAdjustment>,
}

/// Whole weeks between the Monday-aligned epoch week and `date`.
///
/// Week 0 starts on Monday 1969-12-29, the Monday of the week containing
/// 1970-01-01, so weeks always begin on Monday.
pub fn weeks_since_epoch(date: NaiveDate) -> i64 {
    let days = i64::from(date.num_days_from_ce()) - i64::from(epoch_monday().num_days_from_ce());
    days.div_euclid(7)
}

fn epoch_monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(1969, 12, 29).unwrap_or(NaiveDate::MIN)
}

/// Resolves expected minutes from schedule configuration.
#[derive(Debug, Clone)]
pub struct ScheduleResolver {
    default_daily_hours: Decimal,
    weekend_days: Vec<Weekday>,
}

impl Default for ScheduleResolver {
    fn default() -> Self {
        Self::new(&ScheduleSettings::default())
    }
}

impl ScheduleResolver {
    /// Creates a resolver from schedule settings.
    pub fn new(settings: &ScheduleSettings) -> Self {
        Self {
            default_daily_hours: settings.default_daily_hours,
            weekend_days: settings.weekend_days.clone(),
        }
    }

    /// Returns the expected minutes for a date.
    ///
    /// # Example
    ///
    /// ```
    /// use worktime_engine::calculation::{DayExceptions, ScheduleResolver};
    /// use worktime_engine::models::Employee;
    /// use chrono::NaiveDate;
    ///
    /// let resolver = ScheduleResolver::default();
    /// let employee = Employee::new("emp_001", "BY");
    /// let thursday = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
    ///
    /// // Unconfigured schedule: 8.5 hours.
    /// assert_eq!(resolver.expected_minutes(&employee, &[], &DayExceptions::none(), thursday), 510);
    /// ```
    pub fn expected_minutes(
        &self,
        employee: &Employee,
        rules: &[ScheduleOverrideRule],
        exceptions: &DayExceptions,
        date: NaiveDate,
    ) -> i64 {
        self.resolve(employee, rules, exceptions, date).minutes
    }

    /// Resolves a date, recording every adjustment applied.
    pub fn resolve(
        &self,
        employee: &Employee,
        rules: &[ScheduleOverrideRule],
        exceptions: &DayExceptions,
        date: NaiveDate,
    ) -> ExpectedDay {
        let mut adjustments = Vec::new();
        let (base_hours, explicit_entry) = self.base_hours(employee, date, &mut adjustments);
        let mut hours = base_hours;

        let rule = Self::matching_rule(employee, rules, date);
        let rule_declares_work = rule.is_some_and(|rule| rule.mode != RuleMode::Off);

        if self.weekend_days.contains(&date.weekday()) && !explicit_entry && !rule_declares_work {
            hours = Decimal::ZERO;
            adjustments.push(ExpectedAdjustment::Weekend);
        }

        if let Some(rule) = rule {
            match rule.mode {
                RuleMode::Off => {
                    hours = Decimal::ZERO;
                    adjustments.push(ExpectedAdjustment::RuleOff { rule_id: rule.id });
                }
                RuleMode::HalfDay => {
                    hours /= Decimal::TWO;
                    adjustments.push(ExpectedAdjustment::RuleHalfDay { rule_id: rule.id });
                }
                RuleMode::Normal => {
                    adjustments.push(ExpectedAdjustment::RuleNormal { rule_id: rule.id });
                }
            }
        }

        if let Some(holiday) = &exceptions.holiday {
            if exceptions.holiday_deduction.deducts() {
                hours = Decimal::ZERO;
                adjustments.push(ExpectedAdjustment::PublicHoliday {
                    name: holiday.name.clone(),
                });
            } else {
                adjustments.push(ExpectedAdjustment::HolidayNotDeducted {
                    name: holiday.name.clone(),
                });
            }
        }

        if exceptions.company_closure {
            if exceptions.has_punches {
                adjustments.push(ExpectedAdjustment::CompanyClosureWorked);
            } else {
                hours = Decimal::ZERO;
                adjustments.push(ExpectedAdjustment::CompanyClosure);
            }
        }

        if let Some(absence) = exceptions.absence {
            hours = match absence.portion {
                DayPortion::Full => Decimal::ZERO,
                DayPortion::Half => hours / Decimal::TWO,
            };
            adjustments.push(ExpectedAdjustment::Absence {
                kind: absence.kind,
                portion: absence.portion,
            });
        }

        let factor = Self::percentage_factor(employee);
        if factor != Decimal::ONE {
            adjustments.push(ExpectedAdjustment::Percentage { factor });
        }

        let minutes = match Self::to_minutes(hours, factor) {
            Some(minutes) => minutes,
            None => {
                report_invalid(
                    employee,
                    format!("expected time out of range: {hours}h at factor {factor}"),
                );
                Self::to_minutes(self.default_daily_hours, Decimal::ONE).unwrap_or(0)
            }
        };

        ExpectedDay {
            date,
            minutes,
            base_hours,
            adjustments,
        }
    }

    /// Returns the schedule hours and whether the weekday had an explicit
    /// cycle entry.
    fn base_hours(
        &self,
        employee: &Employee,
        date: NaiveDate,
        adjustments: &mut Vec<ExpectedAdjustment>,
    ) -> (Decimal, bool) {
        let schedule = &employee.schedule;
        let daily = match schedule.daily_hours {
            Some(hours) if hours >= Decimal::ZERO => hours,
            Some(hours) => {
                report_invalid(employee, format!("negative daily hours {hours}"));
                self.default_daily_hours
            }
            None => self.default_daily_hours,
        };

        if schedule.effective_date.is_some_and(|effective| date < effective) {
            adjustments.push(ExpectedAdjustment::BeforeEffectiveDate);
            return (daily, false);
        }

        if !schedule.has_cycle() {
            adjustments.push(ExpectedAdjustment::FlatHours);
            return (daily, false);
        }

        let cycle_len = schedule.weekly_cycle.len() as i64;
        let index = weeks_since_epoch(date).rem_euclid(cycle_len) as usize;
        let week = &schedule.weekly_cycle[index];
        let weekday = date.weekday();

        let mut found = None;
        for (key, hours) in week {
            match Weekday::from_str(key.trim()) {
                Ok(day) if day == weekday => {
                    if *hours >= Decimal::ZERO {
                        found = Some(*hours);
                    } else {
                        report_invalid(
                            employee,
                            format!("negative hours {hours} for '{key}' in cycle week {index}"),
                        );
                    }
                }
                Ok(_) => {}
                Err(_) => report_invalid(
                    employee,
                    format!("unknown weekday '{key}' in cycle week {index}"),
                ),
            }
        }

        match found {
            Some(hours) => {
                adjustments.push(ExpectedAdjustment::CycleWeek { index });
                (hours, true)
            }
            None => {
                adjustments.push(ExpectedAdjustment::CycleFallback { index });
                (daily, false)
            }
        }
    }

    /// Picks the rule governing `date`: the most recently started match,
    /// ties broken by the highest rule id.
    fn matching_rule<'a>(
        employee: &Employee,
        rules: &'a [ScheduleOverrideRule],
        date: NaiveDate,
    ) -> Option<&'a ScheduleOverrideRule> {
        rules
            .iter()
            .filter(|rule| rule.employee_id == employee.id)
            .filter(|rule| match rule.matches(date) {
                RuleMatch::Matches => true,
                RuleMatch::NoMatch => false,
                RuleMatch::Invalid(message) => {
                    report_invalid(employee, message);
                    false
                }
            })
            .max_by_key(|rule| (rule.start_date, rule.id))
    }

    fn percentage_factor(employee: &Employee) -> Decimal {
        match employee.employment_percentage {
            None => Decimal::ONE,
            Some(pct) if pct >= Decimal::ZERO => pct / Decimal::ONE_HUNDRED,
            Some(pct) => {
                report_invalid(employee, format!("negative employment percentage {pct}"));
                Decimal::ONE
            }
        }
    }

    /// `None` when the scaled value overflows.
    fn to_minutes(hours: Decimal, factor: Decimal) -> Option<i64> {
        let minutes = hours
            .checked_mul(factor)?
            .checked_mul(Decimal::from(60))?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        minutes.to_i64().map(|minutes| minutes.max(0))
    }
}

fn report_invalid(employee: &Employee, message: String) {
    let error = EngineError::InvalidSchedule {
        employee_id: employee.id.clone(),
        message,
    };
    warn!(employee_id = %employee.id, error = %error, "Falling back to default schedule");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::AbsenceDay;
    use crate::models::{HolidayDeduction, PublicHoliday, RuleRecurrence, WeekHours};
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn week(entries: &[(&str, &str)]) -> WeekHours {
        entries
            .iter()
            .map(|(day, hours)| (day.to_string(), dec(hours)))
            .collect()
    }

    fn rule(mode: RuleMode, start: NaiveDate) -> ScheduleOverrideRule {
        ScheduleOverrideRule {
            id: 1,
            employee_id: "emp_001".to_string(),
            recurrence: RuleRecurrence::Recurring,
            start_date: start,
            end_date: None,
            repeat_interval_days: Some(7),
            weekday: None,
            mode,
        }
    }

    fn holiday(name: &str, on: NaiveDate) -> PublicHoliday {
        PublicHoliday {
            date: on,
            name: name.to_string(),
            region: "BY".to_string(),
        }
    }

    fn employee() -> Employee {
        Employee::new("emp_001", "BY")
    }

    // 2026-01-15 is a Thursday, 2026-01-17 a Saturday.
    fn thursday() -> NaiveDate {
        date(2026, 1, 15)
    }

    fn saturday() -> NaiveDate {
        date(2026, 1, 17)
    }

    #[test]
    fn test_unconfigured_employee_gets_default() {
        let resolver = ScheduleResolver::default();
        let day = resolver.resolve(&employee(), &[], &DayExceptions::none(), thursday());
        assert_eq!(day.minutes, 510);
        assert_eq!(day.adjustments, vec![ExpectedAdjustment::FlatHours]);
    }

    #[test]
    fn test_employee_daily_hours() {
        let mut employee = employee();
        employee.schedule.daily_hours = Some(dec("7.75"));
        let resolver = ScheduleResolver::default();
        assert_eq!(
            resolver.expected_minutes(&employee, &[], &DayExceptions::none(), thursday()),
            465
        );
    }

    #[test]
    fn test_weekend_is_off_without_explicit_entry() {
        let resolver = ScheduleResolver::default();
        let day = resolver.resolve(&employee(), &[], &DayExceptions::none(), saturday());
        assert_eq!(day.minutes, 0);
        assert!(day.adjustments.contains(&ExpectedAdjustment::Weekend));
    }

    #[test]
    fn test_weekend_with_cycle_entry_is_worked() {
        let mut employee = employee();
        employee.schedule.weekly_cycle = vec![week(&[("saturday", "4")])];
        let resolver = ScheduleResolver::default();
        assert_eq!(
            resolver.expected_minutes(&employee, &[], &DayExceptions::none(), saturday()),
            240
        );
    }

    #[test]
    fn test_weekend_with_normal_rule_is_worked() {
        let mut employee = employee();
        employee.schedule.daily_hours = Some(dec("6"));
        let rules = vec![rule(RuleMode::Normal, saturday())];
        let resolver = ScheduleResolver::default();
        assert_eq!(
            resolver.expected_minutes(&employee, &rules, &DayExceptions::none(), saturday()),
            360
        );
    }

    #[test]
    fn test_cycle_alternates_weeks() {
        let mut employee = employee();
        employee.schedule.weekly_cycle = vec![
            week(&[("thursday", "8")]),
            week(&[("thursday", "4")]),
        ];
        let resolver = ScheduleResolver::default();

        let this_week = resolver.expected_minutes(&employee, &[], &DayExceptions::none(), thursday());
        let next_week =
            resolver.expected_minutes(&employee, &[], &DayExceptions::none(), date(2026, 1, 22));
        let mut pair = [this_week, next_week];
        pair.sort();
        assert_eq!(pair, [240, 480]);

        let two_weeks =
            resolver.expected_minutes(&employee, &[], &DayExceptions::none(), date(2026, 1, 29));
        assert_eq!(two_weeks, this_week);
    }

    #[test]
    fn test_cycle_missing_weekday_falls_back_to_daily() {
        let mut employee = employee();
        employee.schedule.daily_hours = Some(dec("8"));
        employee.schedule.weekly_cycle = vec![week(&[("mon", "6")])];
        let resolver = ScheduleResolver::default();
        let day = resolver.resolve(&employee, &[], &DayExceptions::none(), thursday());
        assert_eq!(day.minutes, 480);
        assert_eq!(day.adjustments, vec![ExpectedAdjustment::CycleFallback { index: 0 }]);
    }

    #[test]
    fn test_before_effective_date_uses_flat_hours() {
        let mut employee = employee();
        employee.schedule.daily_hours = Some(dec("8"));
        employee.schedule.weekly_cycle = vec![week(&[("thursday", "2")])];
        employee.schedule.effective_date = Some(date(2026, 2, 1));
        let resolver = ScheduleResolver::default();
        assert_eq!(
            resolver.expected_minutes(&employee, &[], &DayExceptions::none(), thursday()),
            480
        );
        assert_eq!(
            resolver.expected_minutes(&employee, &[], &DayExceptions::none(), date(2026, 2, 5)),
            120
        );
    }

    #[test]
    fn test_unknown_weekday_key_is_ignored() {
        let mut employee = employee();
        employee.schedule.weekly_cycle = vec![week(&[("funday", "3"), ("thursday", "5")])];
        let resolver = ScheduleResolver::default();
        assert_eq!(
            resolver.expected_minutes(&employee, &[], &DayExceptions::none(), thursday()),
            300
        );
    }

    #[test]
    fn test_negative_values_fall_back_to_default() {
        let mut employee = employee();
        employee.schedule.daily_hours = Some(dec("-3"));
        employee.schedule.weekly_cycle = vec![week(&[("thursday", "-8")])];
        employee.employment_percentage = Some(dec("-50"));
        let resolver = ScheduleResolver::default();
        assert_eq!(
            resolver.expected_minutes(&employee, &[], &DayExceptions::none(), thursday()),
            510
        );
    }

    #[test]
    fn test_overflowing_hours_fall_back_to_default() {
        let resolver = ScheduleResolver::default();

        let mut huge_hours = employee();
        huge_hours.schedule.daily_hours = Some(Decimal::MAX);
        assert_eq!(
            resolver.expected_minutes(&huge_hours, &[], &DayExceptions::none(), thursday()),
            510
        );

        let mut huge_percentage = employee();
        huge_percentage.employment_percentage = Some(Decimal::MAX);
        assert_eq!(
            resolver.expected_minutes(&huge_percentage, &[], &DayExceptions::none(), thursday()),
            510
        );
    }

    #[test]
    fn test_rule_off_zeroes() {
        let rules = vec![rule(RuleMode::Off, thursday())];
        let resolver = ScheduleResolver::default();
        let day = resolver.resolve(&employee(), &rules, &DayExceptions::none(), thursday());
        assert_eq!(day.minutes, 0);
        assert!(day.adjustments.contains(&ExpectedAdjustment::RuleOff { rule_id: 1 }));
    }

    #[test]
    fn test_rule_for_other_employee_is_ignored() {
        let mut other = rule(RuleMode::Off, thursday());
        other.employee_id = "emp_999".to_string();
        let resolver = ScheduleResolver::default();
        assert_eq!(
            resolver.expected_minutes(&employee(), &[other], &DayExceptions::none(), thursday()),
            510
        );
    }

    #[test]
    fn test_latest_starting_rule_wins() {
        let older = rule(RuleMode::Off, date(2026, 1, 1));
        let mut newer = rule(RuleMode::HalfDay, date(2026, 1, 8));
        newer.id = 2;
        let mut older_daily = older.clone();
        older_daily.repeat_interval_days = Some(1);
        let resolver = ScheduleResolver::default();
        assert_eq!(
            resolver.expected_minutes(
                &employee(),
                &[older_daily, newer],
                &DayExceptions::none(),
                thursday()
            ),
            255
        );
    }

    #[test]
    fn test_percentage_half_day_scenario() {
        // 8h x 50% x half-day x 60 = 120 minutes
        let mut employee = employee();
        employee.schedule.daily_hours = Some(dec("8"));
        employee.employment_percentage = Some(dec("50"));
        let rules = vec![rule(RuleMode::HalfDay, thursday())];
        let resolver = ScheduleResolver::default();
        assert_eq!(
            resolver.expected_minutes(&employee, &rules, &DayExceptions::none(), thursday()),
            120
        );
    }

    #[test]
    fn test_deducted_holiday_zeroes() {
        let exceptions = DayExceptions {
            holiday: Some(holiday("Epiphany", thursday())),
            holiday_deduction: HolidayDeduction::Pending,
            ..DayExceptions::none()
        };
        let resolver = ScheduleResolver::default();
        assert_eq!(resolver.expected_minutes(&employee(), &[], &exceptions, thursday()), 0);
    }

    #[test]
    fn test_not_deducted_holiday_keeps_base() {
        let mut employee = employee();
        employee.employment_percentage = Some(dec("60"));
        employee.schedule.daily_hours = Some(dec("8"));
        let exceptions = DayExceptions {
            holiday: Some(holiday("Epiphany", thursday())),
            holiday_deduction: HolidayDeduction::DoNotDeduct,
            ..DayExceptions::none()
        };
        let resolver = ScheduleResolver::default();
        assert_eq!(resolver.expected_minutes(&employee, &[], &exceptions, thursday()), 288);
    }

    #[test]
    fn test_half_day_rule_on_holiday_is_zero() {
        let rules = vec![rule(RuleMode::HalfDay, thursday())];
        let exceptions = DayExceptions {
            holiday: Some(holiday("Epiphany", thursday())),
            holiday_deduction: HolidayDeduction::Deduct,
            ..DayExceptions::none()
        };
        let resolver = ScheduleResolver::default();
        assert_eq!(resolver.expected_minutes(&employee(), &rules, &exceptions, thursday()), 0);
    }

    #[test]
    fn test_full_absence_zeroes_and_half_absence_halves() {
        let resolver = ScheduleResolver::default();
        let full = DayExceptions {
            absence: Some(AbsenceDay {
                kind: AbsenceKind::SickLeave,
                portion: DayPortion::Full,
            }),
            ..DayExceptions::none()
        };
        let half = DayExceptions {
            absence: Some(AbsenceDay {
                kind: AbsenceKind::Vacation,
                portion: DayPortion::Half,
            }),
            ..DayExceptions::none()
        };
        assert_eq!(resolver.expected_minutes(&employee(), &[], &full, thursday()), 0);
        assert_eq!(resolver.expected_minutes(&employee(), &[], &half, thursday()), 255);
    }

    #[test]
    fn test_company_closure_with_punches_is_normal_day() {
        let resolver = ScheduleResolver::default();
        let idle = DayExceptions {
            company_closure: true,
            ..DayExceptions::none()
        };
        let worked = DayExceptions {
            company_closure: true,
            has_punches: true,
            ..DayExceptions::none()
        };
        assert_eq!(resolver.expected_minutes(&employee(), &[], &idle, thursday()), 0);
        assert_eq!(resolver.expected_minutes(&employee(), &[], &worked, thursday()), 510);
    }

    #[test]
    fn test_rounds_to_nearest_minute() {
        // 7.3h at 33% = 144.54 minutes
        let mut employee = employee();
        employee.schedule.daily_hours = Some(dec("7.3"));
        employee.employment_percentage = Some(dec("33"));
        let resolver = ScheduleResolver::default();
        assert_eq!(
            resolver.expected_minutes(&employee, &[], &DayExceptions::none(), thursday()),
            145
        );
    }

    #[test]
    fn test_weeks_since_epoch_aligned_to_monday() {
        assert_eq!(weeks_since_epoch(date(1969, 12, 29)), 0);
        assert_eq!(weeks_since_epoch(date(1970, 1, 4)), 0);
        assert_eq!(weeks_since_epoch(date(1970, 1, 5)), 1);
        assert_eq!(weeks_since_epoch(date(1969, 12, 28)), -1);
        assert_eq!(weeks_since_epoch(date(2026, 1, 12)), weeks_since_epoch(date(2026, 1, 18)));
    }

    proptest! {
        #[test]
        fn prop_expected_minutes_non_negative_and_deterministic(
            days in 0i64..40_000,
            daily in -20i64..200,
            pct in -50i64..150,
            cycle_hours in proptest::collection::vec(-10i64..120, 0..4),
        ) {
            let on = date(1990, 1, 1) + chrono::Duration::days(days);
            let mut employee = employee();
            employee.schedule.daily_hours = Some(Decimal::new(daily, 1));
            employee.employment_percentage = Some(Decimal::from(pct));
            employee.schedule.weekly_cycle = cycle_hours
                .iter()
                .map(|h| {
                    let monday = Decimal::new(*h, 1).to_string();
                    week(&[("monday", monday.as_str()), ("friday", "4")])
                })
                .collect();

            let resolver = ScheduleResolver::default();
            let first = resolver.expected_minutes(&employee, &[], &DayExceptions::none(), on);
            let second = resolver.expected_minutes(&employee, &[], &DayExceptions::none(), on);
            prop_assert!(first >= 0);
            prop_assert_eq!(first, second);
        }
    }
}
