//! Regional public holiday lookup.
//!
//! Holiday computation is a pure function of (year, region). [`HolidayCache`]
//! layers memoization on top of any [`HolidayProvider`]: a miss computes and
//! stores the year's list, a hit serves it, and entries can be invalidated
//! per (year, region) or cleared wholesale when the rules change.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate};
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::config::{HolidayDate, HolidayRule};
use crate::models::PublicHoliday;

/// Supplies the public holidays of a region for one year.
pub trait HolidayProvider: Send + Sync {
    /// Returns every holiday observed in `region` during `year`.
    fn holidays(&self, year: i32, region: &str) -> Vec<PublicHoliday>;
}

/// Computes Western Easter Sunday for a Gregorian year.
///
/// # Example
///
/// ```
/// use worktime_engine::calculation::easter_sunday;
/// use chrono::NaiveDate;
///
/// assert_eq!(easter_sunday(2026), NaiveDate::from_ymd_opt(2026, 4, 5));
/// ```
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;

    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

/// Computes holidays from configured rules.
#[derive(Debug, Clone, Default)]
pub struct RuleHolidayProvider {
    rules: Vec<HolidayRule>,
}

impl RuleHolidayProvider {
    /// Creates a provider over the given rules.
    pub fn new(rules: Vec<HolidayRule>) -> Self {
        Self { rules }
    }

    fn date_in(rule: &HolidayRule, year: i32) -> Option<NaiveDate> {
        match rule.date {
            HolidayDate::Fixed { month, day } => NaiveDate::from_ymd_opt(year, month, day),
            HolidayDate::EasterOffset { days } => {
                easter_sunday(year).map(|easter| easter + Duration::days(days))
            }
        }
    }
}

impl HolidayProvider for RuleHolidayProvider {
    fn holidays(&self, year: i32, region: &str) -> Vec<PublicHoliday> {
        let mut holidays: Vec<PublicHoliday> = self
            .rules
            .iter()
            .filter(|rule| rule.applies_to(region))
            .filter_map(|rule| match Self::date_in(rule, year) {
                Some(date) => Some(PublicHoliday {
                    date,
                    name: rule.name.clone(),
                    region: region.to_string(),
                }),
                None => {
                    warn!(holiday = %rule.name, year, "Holiday rule yields no valid date");
                    None
                }
            })
            .collect();
        holidays.sort_by_key(|holiday| holiday.date);
        holidays
    }
}

type CacheKey = (i32, String);

/// Memoizing holiday lookup.
pub struct HolidayCache {
    provider: Box<dyn HolidayProvider>,
    entries: RwLock<HashMap<CacheKey, Arc<Vec<PublicHoliday>>>>,
}

impl HolidayCache {
    /// Wraps a provider with an empty cache.
    pub fn new(provider: impl HolidayProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn key(year: i32, region: &str) -> CacheKey {
        (year, region.to_ascii_uppercase())
    }

    /// Returns the holidays for a year and region, computing them on a miss.
    pub fn holidays(&self, year: i32, region: &str) -> Arc<Vec<PublicHoliday>> {
        let key = Self::key(year, region);
        if let Some(hit) = self.entries.read().get(&key) {
            return Arc::clone(hit);
        }

        debug!(year, region, "Computing holiday calendar");
        let computed = Arc::new(self.provider.holidays(year, region));
        let mut entries = self.entries.write();
        Arc::clone(entries.entry(key).or_insert(computed))
    }

    /// Returns the holiday on `date` in `region`, if any.
    pub fn holiday_on(&self, date: NaiveDate, region: &str) -> Option<PublicHoliday> {
        self.holidays(date.year(), region)
            .iter()
            .find(|holiday| holiday.date == date)
            .cloned()
    }

    /// Drops the cached entry for one year and region.
    pub fn invalidate(&self, year: i32, region: &str) {
        self.entries.write().remove(&Self::key(year, region));
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of cached (year, region) entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl std::fmt::Debug for HolidayCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HolidayCache")
            .field("entries", &self.len())
            .finish()
    }
}
