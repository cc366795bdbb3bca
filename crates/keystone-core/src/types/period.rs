//! Tenor periods such as `3M`, `1Y` and the money-market shorthands `ON`/`TN`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Unit of a [`Period`].
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum PeriodUnit {
    /// Calendar days
    Day,
    /// Weeks of seven days
    Week,
    /// Calendar months
    Month,
    /// Calendar years
    Year,
}

impl PeriodUnit {
    /// Single-letter code used in tenor strings.
    #[must_use]
    pub fn code(&self) -> char {
        match self {
            PeriodUnit::Day => 'D',
            PeriodUnit::Week => 'W',
            PeriodUnit::Month => 'M',
            PeriodUnit::Year => 'Y',
        }
    }
}

/// A multiplier and unit, e.g. `3M`.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Period {
    /// Number of units.
    pub multiplier: i32,
    /// Unit of the period.
    pub unit: PeriodUnit,
}

impl Period {
    /// Creates a period.
    #[must_use]
    pub const fn new(multiplier: i32, unit: PeriodUnit) -> Self {
        Self { multiplier, unit }
    }

    /// Parses a tenor string.
    ///
    /// Accepts `<n><D|W|M|Y>` (case-insensitive) as well as the shorthands
    /// `ON` (1D), `TN` (2D), `SN` (3D) and `SW` (1W).
    pub fn parse(s: &str) -> CoreResult<Self> {
        let s = s.trim().to_uppercase();
        if s.is_empty() {
            return Err(CoreError::invalid_period(s, "empty tenor string"));
        }
        if !s.is_ascii() {
            return Err(CoreError::invalid_period(s, "non-ascii tenor string"));
        }

        match s.as_str() {
            "ON" => return Ok(Self::new(1, PeriodUnit::Day)),
            "TN" => return Ok(Self::new(2, PeriodUnit::Day)),
            "SN" => return Ok(Self::new(3, PeriodUnit::Day)),
            "SW" => return Ok(Self::new(1, PeriodUnit::Week)),
            _ => {}
        }

        let (num_str, unit) = s.split_at(s.len() - 1);
        let multiplier: i32 = num_str
            .parse()
            .map_err(|_| CoreError::invalid_period(&s, "invalid number"))?;
        if multiplier < 0 {
            return Err(CoreError::invalid_period(&s, "negative multiplier"));
        }

        let unit = match unit {
            "D" => PeriodUnit::Day,
            "W" => PeriodUnit::Week,
            "M" => PeriodUnit::Month,
            "Y" => PeriodUnit::Year,
            other => {
                return Err(CoreError::invalid_period(
                    &s,
                    format!("invalid tenor unit: {other}"),
                ))
            }
        };
        Ok(Self::new(multiplier, unit))
    }

    /// Adds two periods.
    ///
    /// Months and years combine into months, days and weeks into days.
    /// Mixing a day-based and a month-based period is an error.
    pub fn checked_add(&self, other: Period) -> CoreResult<Period> {
        use PeriodUnit::{Day, Month, Week, Year};

        if self.unit == other.unit {
            return Ok(Self::new(self.multiplier + other.multiplier, self.unit));
        }
        match (self.unit, other.unit) {
            (Month | Year, Month | Year) => Ok(Self::new(
                self.in_months() + other.in_months(),
                PeriodUnit::Month,
            )),
            (Day | Week, Day | Week) => Ok(Self::new(
                self.in_days() + other.in_days(),
                PeriodUnit::Day,
            )),
            _ => Err(CoreError::invalid_period(
                format!("{self}+{other}"),
                "cannot add day-based and month-based periods",
            )),
        }
    }

    /// Approximate length in years, used for ordering pillars.
    #[must_use]
    pub fn years(&self) -> f64 {
        let m = f64::from(self.multiplier);
        match self.unit {
            PeriodUnit::Day => m / 365.0,
            PeriodUnit::Week => m * 7.0 / 365.0,
            PeriodUnit::Month => m / 12.0,
            PeriodUnit::Year => m,
        }
    }

    fn in_months(&self) -> i32 {
        match self.unit {
            PeriodUnit::Year => self.multiplier * 12,
            _ => self.multiplier,
        }
    }

    fn in_days(&self) -> i32 {
        match self.unit {
            PeriodUnit::Week => self.multiplier * 7,
            _ => self.multiplier,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.multiplier, self.unit.code())
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
