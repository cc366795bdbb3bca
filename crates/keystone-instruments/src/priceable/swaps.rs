//! Swap instruments.

use keystone_core::daycounts::DayCountFraction;
use keystone_core::traits::MarketData;
use keystone_core::types::{Date, Period};

use super::{par_rate, AssetCore, Priceable};

/// Which kind of swap was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapKind {
    /// Fixed against a term index.
    Vanilla,
    /// Fixed against a compounded overnight index.
    Ois,
    /// Vanilla swap cleared through a CCP.
    Cleared,
    /// Fixed against inflation.
    Inflation {
        /// Single exchange at maturity.
        zero_coupon: bool,
    },
    /// Fixed-fixed cross currency swap.
    CrossCurrency,
    /// Float against float.
    Basis {
        /// Legs in different currencies.
        cross_currency: bool,
        /// Notional resets each period.
        resettable: bool,
    },
}

/// A swap with its fixed (or margin) leg schedule.
#[derive(Debug, Clone)]
pub struct SwapAsset {
    pub(crate) core: AssetCore,
    kind: SwapKind,
    start_date: Date,
    payment_dates: Vec<Date>,
    index_term: Option<Period>,
    day_count: DayCountFraction,
    inverted: bool,
}

impl SwapAsset {
    /// Creates the swap. `payment_dates` must be non-empty and end at maturity.
    #[must_use]
    pub fn new(
        core: AssetCore,
        kind: SwapKind,
        start_date: Date,
        payment_dates: Vec<Date>,
        index_term: Option<Period>,
        day_count: DayCountFraction,
    ) -> Self {
        Self {
            core,
            kind,
            start_date,
            payment_dates,
            index_term,
            day_count,
            inverted: false,
        }
    }

    /// Marks the spread quote as quoted on the opposite leg.
    #[must_use]
    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// Kind of swap.
    #[must_use]
    pub fn kind(&self) -> SwapKind {
        self.kind
    }

    /// Effective date.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// Fixed or margin leg payment dates.
    #[must_use]
    pub fn payment_dates(&self) -> &[Date] {
        &self.payment_dates
    }

    /// Floating index tenor.
    #[must_use]
    pub fn index_term(&self) -> Option<Period> {
        self.index_term
    }

    /// True when the market quote was negated on construction.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }
}

impl Priceable for SwapAsset {
    fn core(&self) -> &AssetCore {
        &self.core
    }

    fn implied_quote(&self, market: &dyn MarketData) -> Option<f64> {
        match self.kind {
            // Both floating legs project off the same curve, so the fair
            // basis is zero.
            SwapKind::Basis { .. } => Some(0.0),
            SwapKind::Inflation { zero_coupon: true } => {
                let end = *self.payment_dates.last()?;
                par_rate(market, self.start_date, &[end], self.day_count)
            }
            _ => par_rate(market, self.start_date, &self.payment_dates, self.day_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset_type::AssetType;
    use crate::priceable::test_support::FlatMarket;
    use crate::priceable::payment_schedule;
    use crate::template::fixtures;
    use approx::assert_relative_eq;
    use keystone_core::types::PeriodUnit;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_par_rate_annual_one_period() {
        let base = d(2025, 1, 15);
        let end = d(2026, 1, 15);
        let market = FlatMarket { base, rate: 0.03, forward: None };
        let dates = payment_schedule(base, end, Period::new(1, PeriodUnit::Year)).unwrap();
        let core = AssetCore::new(AssetType::IRSwap, base, end, dec!(1), fixtures::swap());
        let swap = SwapAsset::new(core, SwapKind::Vanilla, base, dates, None, DayCountFraction::Act365Fixed);
        assert_relative_eq!(swap.implied_quote(&market).unwrap(), 0.03_f64.exp() - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_basis_fair_spread_is_zero() {
        let base = d(2025, 1, 15);
        let end = d(2027, 1, 15);
        let market = FlatMarket { base, rate: 0.03, forward: None };
        let core = AssetCore::new(AssetType::BasisSwap, base, end, dec!(1), fixtures::swap());
        let swap = SwapAsset::new(
            core,
            SwapKind::Basis { cross_currency: false, resettable: false },
            base,
            vec![end],
            Some(Period::new(3, PeriodUnit::Month)),
            DayCountFraction::Act365Fixed,
        )
        .inverted(true);
        assert!(swap.is_inverted());
        assert_eq!(swap.implied_quote(&market), Some(0.0));
    }
}
