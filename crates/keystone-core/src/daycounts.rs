//! Day count conventions carried by instrument templates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::Date;

/// Day count fraction conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DayCountFraction {
    /// Actual/360 - money market convention.
    Act360,
    /// Actual/365 Fixed - AUD, NZD and GBP money markets.
    #[default]
    Act365Fixed,
    /// 30/360 bond basis.
    Thirty360,
}

impl DayCountFraction {
    /// Calculates the year fraction between two dates.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        match self {
            DayCountFraction::Act360 => {
                Decimal::from(start.days_between(&end)) / Decimal::from(360)
            }
            DayCountFraction::Act365Fixed => {
                Decimal::from(start.days_between(&end)) / Decimal::from(365)
            }
            DayCountFraction::Thirty360 => {
                let d1 = start.day().min(30);
                let d2 = if d1 == 30 { end.day().min(30) } else { end.day() };
                let days = 360 * (end.year() - start.year())
                    + 30 * (end.month() as i32 - start.month() as i32)
                    + (d2 as i32 - d1 as i32);
                Decimal::from(days) / Decimal::from(360)
            }
        }
    }
}

impl fmt::Display for DayCountFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            DayCountFraction::Act360 => "ACT/360",
            DayCountFraction::Act365Fixed => "ACT/365.FIXED",
            DayCountFraction::Thirty360 => "30/360",
        };
        write!(f, "{code}")
    }
}

impl FromStr for DayCountFraction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACT/360" | "ACT360" => Ok(DayCountFraction::Act360),
            "ACT/365.FIXED" | "ACT/365F" | "ACT/365" | "ACT365F" => {
                Ok(DayCountFraction::Act365Fixed)
            }
            "30/360" | "30360" => Ok(DayCountFraction::Thirty360),
            _ => Err(CoreError::unknown_convention(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_act365_fixed() {
        let yf = DayCountFraction::Act365Fixed.year_fraction(d(2025, 1, 1), d(2026, 1, 1));
        assert_eq!(yf, dec!(1));
    }

    #[test]
    fn test_act360() {
        let yf = DayCountFraction::Act360.year_fraction(d(2025, 1, 1), d(2025, 3, 2));
        assert_eq!(yf, dec!(60) / dec!(360));
    }

    #[test]
    fn test_thirty360() {
        let yf = DayCountFraction::Thirty360.year_fraction(d(2025, 1, 31), d(2025, 7, 31));
        assert_eq!(yf, dec!(0.5));
    }

    #[test]
    fn test_parse_codes() {
        assert_eq!(
            "ACT/365.FIXED".parse::<DayCountFraction>().unwrap(),
            DayCountFraction::Act365Fixed
        );
        assert!("BUS/252".parse::<DayCountFraction>().is_err());
    }
}
