//! Market data abstraction consumed by priceable instruments.

use crate::types::Date;

/// Read-only view of market data used to value instruments.
///
/// Curves resolved from the store implement this; instruments only ever see
/// the trait, never a concrete curve type.
pub trait MarketData: Send + Sync {
    /// Valuation date of the data.
    fn base_date(&self) -> Date;

    /// Discount factor to `date`, or `None` if the data cannot produce one.
    fn discount_factor(&self, date: Date) -> Option<f64>;

    /// Forward value of a non-rate underlying (FX rate, commodity or equity
    /// price) for delivery on `date`.
    fn forward_value(&self, _date: Date) -> Option<f64> {
        None
    }

    /// Forward simple rate between two dates on an ACT/365 basis.
    fn forward_rate(&self, start: Date, end: Date) -> Option<f64> {
        let df_start = self.discount_factor(start)?;
        let df_end = self.discount_factor(end)?;
        let years = start.days_between(&end) as f64 / 365.0;
        if years <= 0.0 || df_end <= 0.0 {
            return None;
        }
        Some((df_start / df_end - 1.0) / years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct FlatCurve {
        base: Date,
        rate: f64,
    }

    impl MarketData for FlatCurve {
        fn base_date(&self) -> Date {
            self.base
        }

        fn discount_factor(&self, date: Date) -> Option<f64> {
            let t = self.base.days_between(&date) as f64 / 365.0;
            Some((-self.rate * t).exp())
        }
    }

    #[test]
    fn test_forward_rate_from_discount_factors() {
        let base = Date::from_ymd(2025, 1, 1).unwrap();
        let curve = FlatCurve { base, rate: 0.05 };
        let end = base.add_days(365);

        let fwd = curve.forward_rate(base, end).unwrap();
        assert_relative_eq!(fwd, 0.05_f64.exp() - 1.0, epsilon = 1e-12);
        assert!(curve.forward_rate(end, base).is_none());
        assert!(curve.forward_value(end).is_none());
    }
}
