//! Pricing structure types and the property keys that describe a stored curve.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Property holding the structure type.
pub const PRICING_STRUCTURE_TYPE: &str = "PricingStructureType";
/// Base rate curve of a basis or cross-currency curve.
pub const REFERENCE_CURVE_UNIQUE_ID: &str = "ReferenceCurveUniqueId";
/// FX curve of a cross-currency curve.
pub const REFERENCE_FX_CURVE_UNIQUE_ID: &str = "ReferenceFxCurveUniqueId";
/// Second-currency rate curve of a cross-currency curve.
pub const REFERENCE_CURRENCY2_CURVE_ID: &str = "ReferenceCurrency2CurveId";
/// Set on a loaded curve that must be rebuilt from its inputs.
pub const BOOTSTRAP: &str = "Bootstrap";
/// Market the curve belongs to, e.g. `EOD`.
pub const MARKET: &str = "Market";

/// Declared type of a stored pricing structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PricingStructureType {
    /// Outright interest rate curve.
    RateCurve,
    /// Discount factor curve.
    DiscountCurve,
    /// Cleared (CCP) rate curve.
    ClearedRateCurve,
    /// Spread over a single reference rate curve.
    RateBasisCurve,
    /// Cross-currency basis curve over a base curve, an FX curve and a
    /// second-currency curve.
    RateXccyCurve,
    /// Spread curve quoted on its own.
    RateSpreadCurve,
    /// FX forward curve.
    FxCurve,
    /// Inflation curve.
    InflationCurve,
    /// Commodity forward curve.
    CommodityCurve,
    /// Equity forward curve.
    EquityCurve,
    /// Bond yield curve.
    BondCurve,
    /// Volatility term structure.
    VolatilityCurve,
    /// Rate volatility matrix.
    RateVolatilityMatrix,
    /// FX volatility matrix.
    FxVolatilityMatrix,
    /// Commodity volatility matrix.
    CommodityVolatilityMatrix,
    /// Equity volatility matrix.
    EquityVolatilityMatrix,
}

impl PricingStructureType {
    /// Every structure type.
    pub const ALL: [PricingStructureType; 16] = [
        Self::RateCurve,
        Self::DiscountCurve,
        Self::ClearedRateCurve,
        Self::RateBasisCurve,
        Self::RateXccyCurve,
        Self::RateSpreadCurve,
        Self::FxCurve,
        Self::InflationCurve,
        Self::CommodityCurve,
        Self::EquityCurve,
        Self::BondCurve,
        Self::VolatilityCurve,
        Self::RateVolatilityMatrix,
        Self::FxVolatilityMatrix,
        Self::CommodityVolatilityMatrix,
        Self::EquityVolatilityMatrix,
    ];

    /// Name as stored in properties.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateCurve => "RateCurve",
            Self::DiscountCurve => "DiscountCurve",
            Self::ClearedRateCurve => "ClearedRateCurve",
            Self::RateBasisCurve => "RateBasisCurve",
            Self::RateXccyCurve => "RateXccyCurve",
            Self::RateSpreadCurve => "RateSpreadCurve",
            Self::FxCurve => "FxCurve",
            Self::InflationCurve => "InflationCurve",
            Self::CommodityCurve => "CommodityCurve",
            Self::EquityCurve => "EquityCurve",
            Self::BondCurve => "BondCurve",
            Self::VolatilityCurve => "VolatilityCurve",
            Self::RateVolatilityMatrix => "RateVolatilityMatrix",
            Self::FxVolatilityMatrix => "FxVolatilityMatrix",
            Self::CommodityVolatilityMatrix => "CommodityVolatilityMatrix",
            Self::EquityVolatilityMatrix => "EquityVolatilityMatrix",
        }
    }

    /// Case-insensitive lookup by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.iter().copied().find(|t| t.as_str().eq_ignore_ascii_case(name))
    }

    /// Property keys naming the curves this type is composed from, in
    /// composition order. Empty for outright curves.
    #[must_use]
    pub fn reference_keys(&self) -> &'static [&'static str] {
        match self {
            Self::RateBasisCurve => &[REFERENCE_CURVE_UNIQUE_ID],
            Self::RateXccyCurve => &[
                REFERENCE_CURVE_UNIQUE_ID,
                REFERENCE_FX_CURVE_UNIQUE_ID,
                REFERENCE_CURRENCY2_CURVE_ID,
            ],
            _ => &[],
        }
    }

    /// True for curves loaded without references.
    #[must_use]
    pub fn is_outright(&self) -> bool {
        self.reference_keys().is_empty()
    }
}

impl fmt::Display for PricingStructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricingStructureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("Unknown pricing structure type: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for t in PricingStructureType::ALL {
            assert_eq!(PricingStructureType::from_name(t.as_str()), Some(t));
        }
        assert_eq!(
            "ratebasiscurve".parse::<PricingStructureType>().unwrap(),
            PricingStructureType::RateBasisCurve
        );
        assert!(PricingStructureType::from_name("Surface").is_none());
    }

    #[test]
    fn test_reference_keys() {
        assert!(PricingStructureType::RateCurve.is_outright());
        assert_eq!(PricingStructureType::RateBasisCurve.reference_keys().len(), 1);
        assert_eq!(
            PricingStructureType::RateXccyCurve.reference_keys(),
            &[REFERENCE_CURVE_UNIQUE_ID, REFERENCE_FX_CURVE_UNIQUE_ID, REFERENCE_CURRENCY2_CURVE_ID]
        );
    }
}
