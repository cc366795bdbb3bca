//! Bonds, bond spot and bond forwards.

use keystone_core::daycounts::DayCountFraction;
use keystone_core::traits::MarketData;
use keystone_core::types::Date;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::{AssetCore, Priceable};
use crate::quotes::QuoteUnits;

/// A fixed-coupon bond, optionally settling forward.
#[derive(Debug, Clone)]
pub struct BondAsset {
    pub(crate) core: AssetCore,
    settlement_date: Date,
    maturity: Date,
    coupon_rate: Decimal,
    coupon_dates: Vec<Date>,
    face_amount: Decimal,
    day_count: DayCountFraction,
    forward_date: Option<Date>,
}

impl BondAsset {
    /// Creates the bond. `coupon_dates` must end at `maturity`.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        core: AssetCore,
        settlement_date: Date,
        maturity: Date,
        coupon_rate: Decimal,
        coupon_dates: Vec<Date>,
        face_amount: Decimal,
        day_count: DayCountFraction,
        forward_date: Option<Date>,
    ) -> Self {
        Self {
            core,
            settlement_date,
            maturity,
            coupon_rate,
            coupon_dates,
            face_amount,
            day_count,
            forward_date,
        }
    }

    /// Spot settlement date.
    #[must_use]
    pub fn settlement_date(&self) -> Date {
        self.settlement_date
    }

    /// Maturity date.
    #[must_use]
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// Coupon as a decimal rate.
    #[must_use]
    pub fn coupon_rate(&self) -> Decimal {
        self.coupon_rate
    }

    /// Face amount.
    #[must_use]
    pub fn face_amount(&self) -> Decimal {
        self.face_amount
    }

    /// Remaining coupon dates.
    #[must_use]
    pub fn coupon_dates(&self) -> &[Date] {
        &self.coupon_dates
    }

    /// Forward settlement date of a bond forward.
    #[must_use]
    pub fn forward_date(&self) -> Option<Date> {
        self.forward_date
    }
}

impl Priceable for BondAsset {
    fn core(&self) -> &AssetCore {
        &self.core
    }

    /// Dirty price per 100 face at the (forward) settlement date.
    fn implied_quote(&self, market: &dyn MarketData) -> Option<f64> {
        let settle = self.forward_date.unwrap_or(self.settlement_date);
        let df_settle = market.discount_factor(settle)?;
        if df_settle <= 0.0 {
            return None;
        }
        let coupon = self.coupon_rate.to_f64()? * 100.0;
        let mut pv = 0.0;
        let mut accrual_start: Option<Date> = None;
        for date in &self.coupon_dates {
            if *date > settle {
                let start = accrual_start.unwrap_or(settle);
                let tau = self.day_count.year_fraction(start, *date).to_f64()?;
                pv += coupon * tau * market.discount_factor(*date)?;
            }
            accrual_start = Some(*date);
        }
        pv += 100.0 * market.discount_factor(self.maturity)?;
        Some(pv / df_settle)
    }

    fn implied_quote_units(&self) -> QuoteUnits {
        QuoteUnits::DirtyPrice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset_type::AssetType;
    use crate::priceable::test_support::FlatMarket;
    use crate::template::fixtures;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_zero_rate_curve_prices_zero_coupon_at_discount() {
        let base = d(2025, 1, 15);
        let maturity = d(2026, 1, 15);
        let market = FlatMarket { base, rate: 0.05, forward: None };
        let core = AssetCore::new(AssetType::Bond, base, maturity, dec!(100), fixtures::bond());
        let bond = BondAsset::new(core, base, maturity, Decimal::ZERO, vec![maturity], dec!(100), DayCountFraction::Act365Fixed, None);
        assert_relative_eq!(bond.implied_quote(&market).unwrap(), 100.0 * (-0.05_f64).exp(), epsilon = 1e-9);
    }

    #[test]
    fn test_annual_coupon_price() {
        let base = d(2025, 1, 15);
        let maturity = d(2026, 1, 15);
        let market = FlatMarket { base, rate: 0.0, forward: None };
        let core = AssetCore::new(AssetType::Bond, base, maturity, dec!(100), fixtures::bond());
        let bond = BondAsset::new(core, base, maturity, dec!(0.05), vec![maturity], dec!(100), DayCountFraction::Act365Fixed, None);
        assert_relative_eq!(bond.implied_quote(&market).unwrap(), 105.0, epsilon = 1e-9);
        assert_eq!(bond.implied_quote_units(), QuoteUnits::DirtyPrice);
    }
}
