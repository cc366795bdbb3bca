//! FX, commodity and equity instruments.

use keystone_core::traits::MarketData;
use keystone_core::types::{Currency, Date};

use super::{AssetCore, Priceable};
use crate::quotes::QuoteUnits;

/// Settlement style of an FX instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FxKind {
    /// Spot settlement.
    Spot,
    /// Outright forward to a tenor.
    Forward,
    /// Today to tomorrow.
    Overnight,
    /// Tomorrow to the day after.
    TomNext,
}

/// An FX rate between two currencies.
#[derive(Debug, Clone)]
pub struct FxAsset {
    pub(crate) core: AssetCore,
    kind: FxKind,
    counter_currency: Option<Currency>,
    value_date: Date,
}

impl FxAsset {
    /// Creates the instrument.
    #[must_use]
    pub fn new(core: AssetCore, kind: FxKind, counter_currency: Option<Currency>, value_date: Date) -> Self {
        Self {
            core,
            kind,
            counter_currency,
            value_date,
        }
    }

    /// Settlement style.
    #[must_use]
    pub fn kind(&self) -> FxKind {
        self.kind
    }

    /// Counter currency, if known.
    #[must_use]
    pub fn counter_currency(&self) -> Option<Currency> {
        self.counter_currency
    }

    /// Value date.
    #[must_use]
    pub fn value_date(&self) -> Date {
        self.value_date
    }
}

impl Priceable for FxAsset {
    fn core(&self) -> &AssetCore {
        &self.core
    }

    fn implied_quote(&self, market: &dyn MarketData) -> Option<f64> {
        market.forward_value(self.value_date)
    }

    fn implied_quote_units(&self) -> QuoteUnits {
        QuoteUnits::FxRate
    }
}

/// Which commodity instrument was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommodityKind {
    /// Spot.
    Spot,
    /// Outright forward.
    Forward,
    /// Forward settling on an average over the averaging period.
    AverageForward,
    /// Spread between two deliveries.
    Spread,
}

/// A commodity price.
#[derive(Debug, Clone)]
pub struct CommodityAsset {
    pub(crate) core: AssetCore,
    kind: CommodityKind,
    commodity: String,
    delivery_date: Date,
    averaging_start: Option<Date>,
}

impl CommodityAsset {
    /// Creates the instrument. `averaging_start` is set for average forwards.
    #[must_use]
    pub fn new(
        core: AssetCore,
        kind: CommodityKind,
        commodity: impl Into<String>,
        delivery_date: Date,
        averaging_start: Option<Date>,
    ) -> Self {
        Self {
            core,
            kind,
            commodity: commodity.into(),
            delivery_date,
            averaging_start,
        }
    }

    /// Instrument kind.
    #[must_use]
    pub fn kind(&self) -> CommodityKind {
        self.kind
    }

    /// Commodity name.
    #[must_use]
    pub fn commodity(&self) -> &str {
        &self.commodity
    }

    /// Delivery date.
    #[must_use]
    pub fn delivery_date(&self) -> Date {
        self.delivery_date
    }
}

impl Priceable for CommodityAsset {
    fn core(&self) -> &AssetCore {
        &self.core
    }

    fn implied_quote(&self, market: &dyn MarketData) -> Option<f64> {
        match self.averaging_start {
            Some(start) => {
                let a = market.forward_value(start)?;
                let b = market.forward_value(self.delivery_date)?;
                Some((a + b) / 2.0)
            }
            None => market.forward_value(self.delivery_date),
        }
    }

    fn implied_quote_units(&self) -> QuoteUnits {
        QuoteUnits::ForwardValue
    }
}

/// An equity price, spot or forward.
#[derive(Debug, Clone)]
pub struct EquityAsset {
    pub(crate) core: AssetCore,
    settlement_date: Date,
    forward: bool,
}

impl EquityAsset {
    /// Creates the instrument.
    #[must_use]
    pub fn new(core: AssetCore, settlement_date: Date, forward: bool) -> Self {
        Self {
            core,
            settlement_date,
            forward,
        }
    }

    /// Settlement date.
    #[must_use]
    pub fn settlement_date(&self) -> Date {
        self.settlement_date
    }

    /// True for forwards.
    #[must_use]
    pub fn is_forward(&self) -> bool {
        self.forward
    }
}

impl Priceable for EquityAsset {
    fn core(&self) -> &AssetCore {
        &self.core
    }

    fn implied_quote(&self, market: &dyn MarketData) -> Option<f64> {
        market.forward_value(self.settlement_date)
    }

    fn implied_quote_units(&self) -> QuoteUnits {
        QuoteUnits::Price
    }
}
