//! Date type for instrument construction and curve lookups.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::period::{Period, PeriodUnit};
use crate::error::{CoreError, CoreResult};

/// Formats accepted by [`Date::parse`], tried in order.
const ACCEPTED_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%Y%m%d", "%d/%m/%y"];

/// A calendar date.
///
/// Newtype around `chrono::NaiveDate` carrying the period arithmetic the
/// instrument factory needs.
///
/// # Example
///
/// ```rust
/// use keystone_core::types::{Date, Period};
///
/// let date = Date::from_ymd(2025, 1, 31).unwrap();
/// let rolled = date.add_period(Period::parse("1M").unwrap()).unwrap();
/// assert_eq!(rolled, Date::from_ymd(2025, 2, 28).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a new date from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the date is invalid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> CoreResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| CoreError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Parses a date in ISO form (`2025-03-15`), day-first form
    /// (`15/03/2025`) or compact form (`20250315`).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if none of the formats match.
    pub fn parse(s: &str) -> CoreResult<Self> {
        let trimmed = s.trim();
        ACCEPTED_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
            .map(Date)
            .ok_or_else(|| CoreError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Adds a number of days to the date.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Date(self.0 + chrono::Duration::days(days))
    }

    /// Adds a number of months to the date.
    ///
    /// If the resulting day would be invalid (e.g., Jan 31 + 1 month),
    /// it rolls back to the last valid day of the month.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the result is out of range.
    pub fn add_months(&self, months: i32) -> CoreResult<Self> {
        let total_months = self.year() * 12 + self.month() as i32 - 1 + months;
        let new_year = total_months.div_euclid(12);
        let new_month = (total_months.rem_euclid(12) + 1) as u32;

        let max_day = days_in_month(new_year, new_month);
        Self::from_ymd(new_year, new_month, self.day().min(max_day))
    }

    /// Adds a number of years to the date.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the result is invalid.
    pub fn add_years(&self, years: i32) -> CoreResult<Self> {
        self.add_months(years * 12)
    }

    /// Adds a tenor such as `3M` or `1Y` using calendar arithmetic only.
    ///
    /// Business day adjustment is the caller's job; see
    /// [`Calendar::advance`](crate::calendars::Calendar::advance).
    pub fn add_period(&self, period: Period) -> CoreResult<Self> {
        match period.unit {
            PeriodUnit::Day => Ok(self.add_days(i64::from(period.multiplier))),
            PeriodUnit::Week => Ok(self.add_days(7 * i64::from(period.multiplier))),
            PeriodUnit::Month => self.add_months(period.multiplier),
            PeriodUnit::Year => self.add_years(period.multiplier),
        }
    }

    /// Calculates the number of calendar days between two dates.
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Returns the underlying `NaiveDate`.
    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }

    /// Returns the last calendar day of the date's month.
    #[must_use]
    pub fn end_of_month(&self) -> Self {
        let last = days_in_month(self.year(), self.month());
        Date(self.0.with_day(last).unwrap_or(self.0))
    }

    /// Returns the day of week.
    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Checks if the date is a weekend (Saturday or Sunday).
    #[must_use]
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Returns the `nth` occurrence (1-based) of `weekday` in the given month.
    ///
    /// Used for IMM dates: the third Wednesday of the contract month.
    pub fn nth_weekday(year: i32, month: u32, weekday: Weekday, nth: u8) -> CoreResult<Self> {
        NaiveDate::from_weekday_of_month_opt(year, month, weekday, nth)
            .map(Date)
            .ok_or_else(|| {
                CoreError::invalid_date(format!("no {nth}th {weekday:?} in {year}-{month:02}"))
            })
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Date {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

/// Returns the number of days in a given month.
fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if NaiveDate::from_ymd_opt(year, 2, 29).is_some() => 29,
        _ => 28,
    }
}
