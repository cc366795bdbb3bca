//! Cash, FRA, rate index, zero-rate and cap/floor instruments.

use keystone_core::daycounts::DayCountFraction;
use keystone_core::traits::MarketData;
use keystone_core::types::{Date, Period};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::{forward_rate, par_rate, AssetCore, Priceable};

/// A single-period simple-rate instrument: deposits, bills, repos, FRAs and
/// rate indices.
///
/// For FRAs `start_date` is the forward start; for everything else it is the
/// spot date.
#[derive(Debug, Clone)]
pub struct SimpleRateAsset {
    pub(crate) core: AssetCore,
    start_date: Date,
    end_date: Date,
    day_count: DayCountFraction,
}

impl SimpleRateAsset {
    /// Creates the instrument.
    #[must_use]
    pub fn new(core: AssetCore, start_date: Date, end_date: Date, day_count: DayCountFraction) -> Self {
        Self {
            core,
            start_date,
            end_date,
            day_count,
        }
    }

    /// Accrual start.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// Accrual end.
    #[must_use]
    pub fn end_date(&self) -> Date {
        self.end_date
    }

    /// Accrual year fraction.
    #[must_use]
    pub fn year_fraction(&self) -> Decimal {
        self.day_count.year_fraction(self.start_date, self.end_date)
    }
}

impl Priceable for SimpleRateAsset {
    fn core(&self) -> &AssetCore {
        &self.core
    }

    fn implied_quote(&self, market: &dyn MarketData) -> Option<f64> {
        forward_rate(market, self.start_date, self.end_date, self.day_count)
    }
}

/// A zero-coupon rate to a maturity date.
#[derive(Debug, Clone)]
pub struct ZeroRateAsset {
    pub(crate) core: AssetCore,
    maturity_date: Date,
    compounding_frequency: Option<Period>,
    day_count: DayCountFraction,
}

impl ZeroRateAsset {
    /// Creates the instrument. `None` compounding means continuous.
    #[must_use]
    pub fn new(
        core: AssetCore,
        maturity_date: Date,
        compounding_frequency: Option<Period>,
        day_count: DayCountFraction,
    ) -> Self {
        Self {
            core,
            maturity_date,
            compounding_frequency,
            day_count,
        }
    }

    /// Maturity date.
    #[must_use]
    pub fn maturity_date(&self) -> Date {
        self.maturity_date
    }
}

impl Priceable for ZeroRateAsset {
    fn core(&self) -> &AssetCore {
        &self.core
    }

    fn implied_quote(&self, market: &dyn MarketData) -> Option<f64> {
        let t = self
            .day_count
            .year_fraction(market.base_date(), self.maturity_date)
            .to_f64()?;
        let df = market.discount_factor(self.maturity_date)?;
        if t <= 0.0 || df <= 0.0 {
            return None;
        }
        match self.compounding_frequency {
            None => Some(-df.ln() / t),
            Some(freq) => {
                let n = 1.0 / freq.years();
                Some(n * (df.powf(-1.0 / (n * t)) - 1.0))
            }
        }
    }
}

/// Caplets, floorlets, caps and floors.
///
/// A caplet has a single period and no `payment_dates`; a cap lists the
/// payment date of every caplet.
#[derive(Debug, Clone)]
pub struct RateOptionAsset {
    pub(crate) core: AssetCore,
    start_date: Date,
    end_date: Date,
    payment_dates: Vec<Date>,
    strike: Option<Decimal>,
    is_floor: bool,
    day_count: DayCountFraction,
}

impl RateOptionAsset {
    /// Creates the instrument.
    #[must_use]
    pub fn new(
        core: AssetCore,
        start_date: Date,
        end_date: Date,
        payment_dates: Vec<Date>,
        strike: Option<Decimal>,
        is_floor: bool,
        day_count: DayCountFraction,
    ) -> Self {
        Self {
            core,
            start_date,
            end_date,
            payment_dates,
            strike,
            is_floor,
            day_count,
        }
    }

    /// Strike, if supplied.
    #[must_use]
    pub fn strike(&self) -> Option<Decimal> {
        self.strike
    }

    /// True for floors and floorlets.
    #[must_use]
    pub fn is_floor(&self) -> bool {
        self.is_floor
    }

    /// Number of optionlets.
    #[must_use]
    pub fn optionlet_count(&self) -> usize {
        self.payment_dates.len().max(1)
    }

    /// First fixing date.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// Last payment date.
    #[must_use]
    pub fn end_date(&self) -> Date {
        self.end_date
    }
}

impl Priceable for RateOptionAsset {
    fn core(&self) -> &AssetCore {
        &self.core
    }

    /// The at-the-money strike: the forward rate for a caplet, the par rate
    /// for a cap.
    fn implied_quote(&self, market: &dyn MarketData) -> Option<f64> {
        if self.payment_dates.len() > 1 {
            par_rate(market, self.start_date, &self.payment_dates, self.day_count)
        } else {
            forward_rate(market, self.start_date, self.end_date, self.day_count)
        }
    }
}
