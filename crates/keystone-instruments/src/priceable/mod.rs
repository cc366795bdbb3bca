//! Priceable instruments produced by the factory.
//!
//! Every instrument wraps an [`AssetCore`] (id, dates, currency, notional,
//! its customised template, the market quote and the original valuation) and
//! adds the dates and terms specific to its family.

mod bonds;
mod futures;
mod markets;
mod rates;
mod swaps;

pub use bonds::BondAsset;
pub use futures::{imm_date, last_trading_date_from_code, FutureAsset, FutureContract};
pub use markets::{CommodityAsset, CommodityKind, EquityAsset, FxAsset, FxKind};
pub use rates::{RateOptionAsset, SimpleRateAsset, ZeroRateAsset};
pub use swaps::{SwapAsset, SwapKind};

use keystone_core::daycounts::DayCountFraction;
use keystone_core::traits::MarketData;
use keystone_core::types::{Currency, Date, Period};
use once_cell::sync::OnceCell;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::asset_type::AssetType;
use crate::error::{ConstructionError, ConstructionResult};
use crate::quotes::{AssetValuation, BasicQuotation, MeasureType, QuoteUnits};
use crate::template::InstrumentTemplate;

/// State shared by every priceable instrument.
#[derive(Debug, Clone)]
pub struct AssetCore {
    id: String,
    asset_type: AssetType,
    currency: Currency,
    base_date: Date,
    risk_maturity_date: Date,
    notional: Decimal,
    template: InstrumentTemplate,
    market_quote: OnceCell<BasicQuotation>,
    valuation: Option<AssetValuation>,
}

impl AssetCore {
    /// Creates the shared state. The market quote starts unset.
    #[must_use]
    pub fn new(
        asset_type: AssetType,
        base_date: Date,
        risk_maturity_date: Date,
        notional: Decimal,
        template: InstrumentTemplate,
    ) -> Self {
        Self {
            id: template.id().to_string(),
            asset_type,
            currency: template.currency(),
            base_date,
            risk_maturity_date,
            notional,
            template,
            market_quote: OnceCell::new(),
            valuation: None,
        }
    }

    /// Asset id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Asset type the instrument was built as.
    #[must_use]
    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    /// Currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Valuation base date.
    #[must_use]
    pub fn base_date(&self) -> Date {
        self.base_date
    }

    /// Date the instrument's risk is bucketed at.
    #[must_use]
    pub fn risk_maturity_date(&self) -> Date {
        self.risk_maturity_date
    }

    /// Notional, or position for futures.
    #[must_use]
    pub fn notional(&self) -> Decimal {
        self.notional
    }

    /// The per-asset template the instrument was built from.
    #[must_use]
    pub fn template(&self) -> &InstrumentTemplate {
        &self.template
    }

    /// The normalised market quote, once set.
    #[must_use]
    pub fn market_quote(&self) -> Option<&BasicQuotation> {
        self.market_quote.get()
    }

    /// Sets the market quote.
    ///
    /// # Errors
    ///
    /// `QuoteAlreadySet` on any call after the first.
    pub fn set_market_quote(&self, quote: BasicQuotation) -> ConstructionResult<()> {
        self.market_quote.set(quote).map_err(|_| ConstructionError::QuoteAlreadySet {
            asset_id: self.id.clone(),
        })
    }

    /// The valuation the instrument was built from, as supplied.
    #[must_use]
    pub fn valuation(&self) -> Option<&AssetValuation> {
        self.valuation.as_ref()
    }

    pub(crate) fn attach_valuation(&mut self, valuation: AssetValuation) {
        self.valuation = Some(valuation);
    }
}

/// Valuation against market data.
pub trait Priceable {
    /// Shared instrument state.
    fn core(&self) -> &AssetCore;

    /// Quote implied by `market`, in the units of the normalised market quote.
    fn implied_quote(&self, market: &dyn MarketData) -> Option<f64>;

    /// Units of [`Priceable::implied_quote`].
    fn implied_quote_units(&self) -> QuoteUnits {
        QuoteUnits::DecimalRate
    }

    /// Values the instrument.
    ///
    /// Returns the implied quote, the discount factor at risk maturity and,
    /// when set, the market quote. Metrics the market data cannot support are
    /// left out.
    fn calculate(&self, market: &dyn MarketData) -> AssetValuation {
        let core = self.core();
        let mut quotes = Vec::with_capacity(3);
        if let Some(implied) = self.implied_quote(market).and_then(Decimal::from_f64) {
            quotes.push(BasicQuotation::new(
                MeasureType::ImpliedQuote,
                implied,
                self.implied_quote_units(),
            ));
        }
        if let Some(df) = market
            .discount_factor(core.risk_maturity_date())
            .and_then(Decimal::from_f64)
        {
            quotes.push(BasicQuotation::new(
                MeasureType::DiscountFactorAtMaturity,
                df,
                QuoteUnits::DecimalValue,
            ));
        }
        if let Some(quote) = core.market_quote() {
            quotes.push(quote.clone());
        }
        AssetValuation::new(core.id(), quotes)
    }
}

/// Any instrument the factory can build.
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub enum PriceableAsset {
    SimpleRate(SimpleRateAsset),
    ZeroRate(ZeroRateAsset),
    RateOption(RateOptionAsset),
    Swap(SwapAsset),
    Future(FutureAsset),
    Bond(BondAsset),
    Fx(FxAsset),
    Commodity(CommodityAsset),
    Equity(EquityAsset),
}

impl PriceableAsset {
    fn inner(&self) -> &dyn Priceable {
        match self {
            PriceableAsset::SimpleRate(a) => a,
            PriceableAsset::ZeroRate(a) => a,
            PriceableAsset::RateOption(a) => a,
            PriceableAsset::Swap(a) => a,
            PriceableAsset::Future(a) => a,
            PriceableAsset::Bond(a) => a,
            PriceableAsset::Fx(a) => a,
            PriceableAsset::Commodity(a) => a,
            PriceableAsset::Equity(a) => a,
        }
    }

    fn core_mut(&mut self) -> &mut AssetCore {
        match self {
            PriceableAsset::SimpleRate(a) => &mut a.core,
            PriceableAsset::ZeroRate(a) => &mut a.core,
            PriceableAsset::RateOption(a) => &mut a.core,
            PriceableAsset::Swap(a) => &mut a.core,
            PriceableAsset::Future(a) => &mut a.core,
            PriceableAsset::Bond(a) => &mut a.core,
            PriceableAsset::Fx(a) => &mut a.core,
            PriceableAsset::Commodity(a) => &mut a.core,
            PriceableAsset::Equity(a) => &mut a.core,
        }
    }

    /// Shared instrument state.
    #[must_use]
    pub fn core(&self) -> &AssetCore {
        self.inner().core()
    }

    /// Asset id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.core().id()
    }

    /// Asset type.
    #[must_use]
    pub fn asset_type(&self) -> AssetType {
        self.core().asset_type()
    }

    /// Risk maturity date.
    #[must_use]
    pub fn risk_maturity_date(&self) -> Date {
        self.core().risk_maturity_date()
    }

    /// Market quote, once set.
    #[must_use]
    pub fn market_quote(&self) -> Option<&BasicQuotation> {
        self.core().market_quote()
    }

    /// Sets the market quote; only the first call succeeds.
    pub fn set_market_quote(&self, quote: BasicQuotation) -> ConstructionResult<()> {
        self.core().set_market_quote(quote)
    }

    /// Original valuation.
    #[must_use]
    pub fn valuation(&self) -> Option<&AssetValuation> {
        self.core().valuation()
    }

    /// Values the instrument against `market`.
    #[must_use]
    pub fn calculate(&self, market: &dyn MarketData) -> AssetValuation {
        self.inner().calculate(market)
    }

    pub(crate) fn attach_valuation(&mut self, valuation: AssetValuation) {
        self.core_mut().attach_valuation(valuation);
    }
}

/// Simple forward rate between two dates under `day_count`.
pub(crate) fn forward_rate(
    market: &dyn MarketData,
    start: Date,
    end: Date,
    day_count: DayCountFraction,
) -> Option<f64> {
    let tau = day_count.year_fraction(start, end).to_f64()?;
    if tau <= 0.0 {
        return None;
    }
    let df_start = market.discount_factor(start)?;
    let df_end = market.discount_factor(end)?;
    if df_end <= 0.0 {
        return None;
    }
    Some((df_start / df_end - 1.0) / tau)
}

/// Par rate of a fixed leg paying on `payment_dates`, accruing from `start`.
pub(crate) fn par_rate(
    market: &dyn MarketData,
    start: Date,
    payment_dates: &[Date],
    day_count: DayCountFraction,
) -> Option<f64> {
    let end = *payment_dates.last()?;
    let mut annuity = 0.0;
    let mut previous = start;
    for date in payment_dates {
        let tau = day_count.year_fraction(previous, *date).to_f64()?;
        annuity += tau * market.discount_factor(*date)?;
        previous = *date;
    }
    if annuity <= 0.0 {
        return None;
    }
    Some((market.discount_factor(start)? - market.discount_factor(end)?) / annuity)
}

/// Unadjusted regular schedule from `start` to `end`, rolled backwards from
/// `end`. The first date returned is the first payment date after `start`.
pub(crate) fn payment_schedule(start: Date, end: Date, frequency: Period) -> ConstructionResult<Vec<Date>> {
    let step = frequency.multiplier;
    if step <= 0 {
        return Err(ConstructionError::invalid_property(
            "frequency",
            format!("{frequency} is not a positive frequency"),
        ));
    }
    let mut dates = Vec::new();
    let mut n = 0;
    loop {
        let back = Period::new(-step * n, frequency.unit);
        let date = end.add_period(back)?;
        if date <= start {
            break;
        }
        dates.push(date);
        n += 1;
    }
    dates.reverse();
    Ok(dates)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::fixtures;
    use keystone_core::types::PeriodUnit;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_market_quote_set_once() {
        let core = AssetCore::new(AssetType::Deposit, d(2025, 1, 15), d(2025, 4, 15), dec!(1), fixtures::deposit());
        assert!(core.market_quote().is_none());
        core.set_market_quote(BasicQuotation::market_quote(dec!(0.04), QuoteUnits::DecimalRate))
            .unwrap();
        let second = core.set_market_quote(BasicQuotation::market_quote(dec!(0.05), QuoteUnits::DecimalRate));
        assert!(matches!(second, Err(ConstructionError::QuoteAlreadySet { .. })));
        assert_eq!(core.market_quote().map(|q| q.value), Some(dec!(0.04)));
    }

    #[test]
    fn test_payment_schedule() {
        let dates = payment_schedule(d(2025, 1, 15), d(2026, 1, 15), Period::new(3, PeriodUnit::Month)).unwrap();
        assert_eq!(dates, vec![d(2025, 4, 15), d(2025, 7, 15), d(2025, 10, 15), d(2026, 1, 15)]);

        let stub = payment_schedule(d(2025, 2, 1), d(2026, 1, 15), Period::new(6, PeriodUnit::Month)).unwrap();
        assert_eq!(stub, vec![d(2025, 7, 15), d(2026, 1, 15)]);
    }
}
