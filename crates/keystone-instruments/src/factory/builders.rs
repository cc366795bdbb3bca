//! Per-family constructors.
//!
//! Each builder receives a validated [`BuildContext`]: required keys are
//! present, the template has the recipe's shape, calendars are resolved and
//! the quote is normalised. Builders write the per-asset fields onto the
//! draft, compute the instrument dates and return the instrument.

use std::sync::Arc;

use keystone_core::calendars::{BusinessDayConvention, Calendar};
use keystone_core::types::{Currency, Date, Period, Properties};
use rust_decimal::Decimal;

use super::registry::Recipe;
use crate::asset_type::{AssetType, OptionType};
use crate::error::{ConstructionError, ConstructionResult};
use crate::keys;
use crate::priceable::{
    last_trading_date_from_code, payment_schedule, AssetCore, BondAsset, CommodityAsset, CommodityKind,
    EquityAsset, FutureAsset, FutureContract, FxAsset, FxKind, PriceableAsset, RateOptionAsset,
    SimpleRateAsset, SwapAsset, SwapKind, ZeroRateAsset,
};
use crate::quotes::{find_quotation, BasicQuotation, MeasureType};
use crate::template::{InstrumentNode, RelativeDateOffset, TemplateDraft};

/// Signature of a recipe's constructor.
pub(crate) type BuildFn = fn(BuildContext<'_>) -> ConstructionResult<PriceableAsset>;

/// Validated inputs to a builder.
pub(crate) struct BuildContext<'a> {
    pub recipe: &'a Recipe,
    pub asset_type: AssetType,
    pub props: &'a Properties,
    pub quotes: &'a [BasicQuotation],
    pub draft: TemplateDraft,
    pub base_date: Date,
    pub notional: Option<Decimal>,
    pub inverted: bool,
    pub fixing: Arc<dyn Calendar>,
    pub payment: Arc<dyn Calendar>,
}

impl BuildContext<'_> {
    fn asset_id(&self) -> String {
        self.draft.id().to_string()
    }

    fn text(&self, key: &str) -> ConstructionResult<&str> {
        self.props
            .get_str(key)
            .ok_or_else(|| ConstructionError::missing_property(key, self.asset_type.as_str()))
    }

    fn period(&self, key: &str) -> ConstructionResult<Period> {
        let text = self.text(key)?;
        Period::parse(text).map_err(|e| ConstructionError::invalid_property(key, e.to_string()))
    }

    fn optional_period(&self, key: &str) -> ConstructionResult<Option<Period>> {
        match self.props.get_str(key) {
            Some(text) => Period::parse(text)
                .map(Some)
                .map_err(|e| ConstructionError::invalid_property(key, e.to_string())),
            None => Ok(None),
        }
    }

    fn date(&self, key: &str) -> ConstructionResult<Date> {
        self.props
            .get_date(key)
            .ok_or_else(|| ConstructionError::missing_property(key, self.asset_type.as_str()))
    }

    fn decimal(&self, key: &str) -> ConstructionResult<Decimal> {
        self.props
            .get_decimal(key)
            .ok_or_else(|| ConstructionError::missing_property(key, self.asset_type.as_str()))
    }

    fn offset_date(&self, calendar: &dyn Calendar, offset: &RelativeDateOffset) -> ConstructionResult<Date> {
        Ok(calendar.advance(self.base_date, offset.period, offset.convention)?)
    }

    fn mismatch(&self) -> ConstructionError {
        ConstructionError::TemplateShapeMismatch {
            asset_id: self.asset_id(),
            expected: self.recipe.shape,
            found: self.draft.node().shape(),
        }
    }

    fn finish(self, risk_maturity: Date) -> AssetCore {
        let notional = self.notional.unwrap_or(Decimal::ONE);
        AssetCore::new(self.asset_type, self.base_date, risk_maturity, notional, self.draft.freeze())
    }
}

/// Deposits, bills and repos. `ON` starts today and `TN` tomorrow; every other
/// term starts at spot.
pub(crate) fn cash(mut ctx: BuildContext<'_>) -> ConstructionResult<PriceableAsset> {
    let term_text = ctx.text(keys::TERM)?.to_uppercase();
    let term = ctx.period(keys::TERM)?;
    let fixing = Arc::clone(&ctx.fixing);
    let payment = Arc::clone(&ctx.payment);

    let (spot_offset, adjustments, day_count) = match ctx.draft.node() {
        InstrumentNode::Deposit(n) => (n.spot_offset.clone(), n.payment_adjustments.clone(), n.day_count),
        _ => return Err(ctx.mismatch()),
    };

    let (start, end) = match term_text.as_str() {
        "ON" => (ctx.base_date, payment.add_business_days(ctx.base_date, 1)),
        "TN" => {
            let start = payment.add_business_days(ctx.base_date, 1);
            (start, payment.add_business_days(start, 1))
        }
        _ => {
            let start = ctx.offset_date(fixing.as_ref(), &spot_offset)?;
            (start, payment.advance(start, term, adjustments.convention)?)
        }
    };

    if let InstrumentNode::Deposit(n) = ctx.draft.node_mut() {
        n.term = Some(term);
    }
    let core = ctx.finish(end);
    Ok(PriceableAsset::SimpleRate(SimpleRateAsset::new(core, start, end, day_count)))
}

/// FRAs: start term from spot, then the index term.
pub(crate) fn fra(mut ctx: BuildContext<'_>) -> ConstructionResult<PriceableAsset> {
    let start_term = ctx.period(keys::START_TERM)?;
    let index_term = ctx.period(keys::EXTRA_ITEM)?;
    let fixing = Arc::clone(&ctx.fixing);
    let payment = Arc::clone(&ctx.payment);

    let (spot_offset, convention, day_count) = match ctx.draft.node() {
        InstrumentNode::Deposit(n) => (n.spot_offset.clone(), n.payment_adjustments.convention, n.day_count),
        _ => return Err(ctx.mismatch()),
    };
    let spot = ctx.offset_date(fixing.as_ref(), &spot_offset)?;
    let start = payment.advance(spot, start_term, convention)?;
    let end = payment.advance(start, index_term, convention)?;

    if let InstrumentNode::Deposit(n) = ctx.draft.node_mut() {
        n.start_term = Some(start_term);
        n.term = Some(index_term);
    }
    let core = ctx.finish(end);
    Ok(PriceableAsset::SimpleRate(SimpleRateAsset::new(core, start, end, day_count)))
}

/// Xibor, OIS and inflation indices: fix at the base date, accrue from the
/// fixing offset over the index tenor.
pub(crate) fn rate_index(mut ctx: BuildContext<'_>) -> ConstructionResult<PriceableAsset> {
    let term = ctx.period(keys::TERM)?;
    let fixing = Arc::clone(&ctx.fixing);
    let payment = Arc::clone(&ctx.payment);

    let (offset, convention, day_count) = match ctx.draft.node() {
        InstrumentNode::RateIndex(n) => (n.fixing_offset.clone(), n.payment_adjustments.convention, n.day_count),
        _ => return Err(ctx.mismatch()),
    };
    let start = ctx.offset_date(fixing.as_ref(), &offset)?;
    let end = payment.advance(start, term, convention)?;

    if let InstrumentNode::RateIndex(n) = ctx.draft.node_mut() {
        n.term = Some(term);
    }
    let core = ctx.finish(end);
    Ok(PriceableAsset::SimpleRate(SimpleRateAsset::new(core, start, end, day_count)))
}

/// Zero rates to an adjusted maturity.
pub(crate) fn zero_rate(mut ctx: BuildContext<'_>) -> ConstructionResult<PriceableAsset> {
    let term = ctx.period(keys::TERM)?;
    let payment = Arc::clone(&ctx.payment);

    let (compounding, convention, day_count) = match ctx.draft.node() {
        InstrumentNode::ZeroRate(n) => (n.compounding_frequency, n.adjustments.convention, n.day_count),
        _ => return Err(ctx.mismatch()),
    };
    let maturity = payment.adjust(ctx.base_date.add_period(term)?, convention);

    if let InstrumentNode::ZeroRate(n) = ctx.draft.node_mut() {
        n.term = Some(term);
    }
    let core = ctx.finish(maturity);
    Ok(PriceableAsset::ZeroRate(ZeroRateAsset::new(core, maturity, compounding, day_count)))
}

fn strike(ctx: &BuildContext<'_>) -> ConstructionResult<Option<Decimal>> {
    if let Some(strike) = ctx.props.get_decimal(keys::STRIKE) {
        return Ok(Some(strike));
    }
    Ok(find_quotation(&MeasureType::Strike, ctx.quotes)?.map(|q| q.value))
}

/// Caplets and floorlets: a single optionlet on the index term.
pub(crate) fn caplet(mut ctx: BuildContext<'_>) -> ConstructionResult<PriceableAsset> {
    let start_term = ctx.period(keys::START_TERM)?;
    let index_term = ctx.period(keys::EXTRA_ITEM)?;
    let strike = strike(&ctx)?;
    let fixing = Arc::clone(&ctx.fixing);
    let payment = Arc::clone(&ctx.payment);

    let (offset, convention, day_count) = match ctx.draft.node() {
        InstrumentNode::RateOption(n) => (n.fixing_offset.clone(), n.payment_adjustments.convention, n.day_count),
        _ => return Err(ctx.mismatch()),
    };
    let spot = ctx.offset_date(fixing.as_ref(), &offset)?;
    let start = payment.advance(spot, start_term, convention)?;
    let end = payment.advance(start, index_term, convention)?;
    let is_floor = matches!(ctx.asset_type, AssetType::Floorlet | AssetType::BillFloorlet);

    if let InstrumentNode::RateOption(n) = ctx.draft.node_mut() {
        n.term = Some(start_term);
        n.index_term = Some(index_term);
        n.strike = strike;
    }
    let core = ctx.finish(end);
    Ok(PriceableAsset::RateOption(RateOptionAsset::new(
        core, start, end, Vec::new(), strike, is_floor, day_count,
    )))
}

/// Caps and floors: optionlets on the index term out to the cap term.
pub(crate) fn cap(mut ctx: BuildContext<'_>) -> ConstructionResult<PriceableAsset> {
    let term = ctx.period(keys::TERM)?;
    let index_term = ctx.period(keys::EXTRA_ITEM)?;
    let strike = strike(&ctx)?;
    let fixing = Arc::clone(&ctx.fixing);
    let payment = Arc::clone(&ctx.payment);

    let (offset, convention, day_count) = match ctx.draft.node() {
        InstrumentNode::RateOption(n) => (n.fixing_offset.clone(), n.payment_adjustments.convention, n.day_count),
        _ => return Err(ctx.mismatch()),
    };
    let start = ctx.offset_date(fixing.as_ref(), &offset)?;
    let end = payment.advance(start, term, convention)?;
    let dates = adjusted_schedule(payment.as_ref(), start, start.add_period(term)?, index_term, convention)?;
    let is_floor = ctx.asset_type == AssetType::IRFloor;

    if let InstrumentNode::RateOption(n) = ctx.draft.node_mut() {
        n.term = Some(term);
        n.index_term = Some(index_term);
        n.strike = strike;
    }
    let core = ctx.finish(end);
    Ok(PriceableAsset::RateOption(RateOptionAsset::new(
        core, start, end, dates, strike, is_floor, day_count,
    )))
}

fn adjusted_schedule(
    calendar: &dyn Calendar,
    start: Date,
    unadjusted_end: Date,
    frequency: Period,
    convention: BusinessDayConvention,
) -> ConstructionResult<Vec<Date>> {
    Ok(payment_schedule(start, unadjusted_end, frequency)?
        .into_iter()
        .map(|d| calendar.adjust(d, convention))
        .collect())
}

/// Fixed-float, OIS, cleared, inflation and fixed-fixed cross currency swaps.
pub(crate) fn swap(mut ctx: BuildContext<'_>) -> ConstructionResult<PriceableAsset> {
    let term = ctx.period(keys::TERM)?;
    let index_override = ctx.optional_period(keys::INDEX_TERM)?;
    let fixing = Arc::clone(&ctx.fixing);
    let payment = Arc::clone(&ctx.payment);

    let (offset, convention, frequency, day_count, template_index) = match ctx.draft.node() {
        InstrumentNode::Swap(n) => (
            n.spot_offset.clone(),
            n.payment_adjustments.convention,
            n.fixed_frequency,
            n.day_count,
            n.index_term,
        ),
        _ => return Err(ctx.mismatch()),
    };
    let start = ctx.offset_date(fixing.as_ref(), &offset)?;
    let dates = adjusted_schedule(payment.as_ref(), start, start.add_period(term)?, frequency, convention)?;
    let end = *dates
        .last()
        .ok_or_else(|| ConstructionError::invalid_property(keys::TERM, format!("{term} produces no payments")))?;
    let index_term = index_override.or(template_index);

    let kind = match ctx.asset_type {
        AssetType::OISSwap => SwapKind::Ois,
        AssetType::ClearedIRSwap => SwapKind::Cleared,
        AssetType::CPISwap => SwapKind::Inflation { zero_coupon: false },
        AssetType::ZCCPISwap => SwapKind::Inflation { zero_coupon: true },
        AssetType::XccySwap => SwapKind::CrossCurrency,
        _ => SwapKind::Vanilla,
    };
    let notional = ctx.notional;
    if let InstrumentNode::Swap(n) = ctx.draft.node_mut() {
        n.term = Some(term);
        n.index_term = index_term;
        if let Some(notional) = notional {
            n.notional = Some(notional);
        }
    }
    let core = ctx.finish(end);
    Ok(PriceableAsset::Swap(SwapAsset::new(core, kind, start, dates, index_term, day_count)))
}

/// Float-float swaps; the margin leg's schedule is kept.
pub(crate) fn basis_swap(mut ctx: BuildContext<'_>) -> ConstructionResult<PriceableAsset> {
    let term = ctx.period(keys::TERM)?;
    let index_override = ctx.optional_period(keys::INDEX_TERM)?;
    let fixing = Arc::clone(&ctx.fixing);
    let payment = Arc::clone(&ctx.payment);

    let (offset, convention, margin_leg, index_leg) = match ctx.draft.node() {
        InstrumentNode::BasisSwap(n) => (
            n.spot_offset.clone(),
            n.payment_adjustments.convention,
            n.margin_leg.clone(),
            n.index_leg.clone(),
        ),
        _ => return Err(ctx.mismatch()),
    };
    let start = ctx.offset_date(fixing.as_ref(), &offset)?;
    let dates = adjusted_schedule(
        payment.as_ref(),
        start,
        start.add_period(term)?,
        margin_leg.payment_frequency,
        convention,
    )?;
    let end = *dates
        .last()
        .ok_or_else(|| ConstructionError::invalid_property(keys::TERM, format!("{term} produces no payments")))?;
    let index_term = index_override.or(index_leg.index_term);

    let kind = SwapKind::Basis {
        cross_currency: ctx.asset_type != AssetType::BasisSwap,
        resettable: ctx.asset_type == AssetType::ResettableXccyBasisSwap,
    };
    let (notional, inverted) = (ctx.notional, ctx.inverted);
    if let InstrumentNode::BasisSwap(n) = ctx.draft.node_mut() {
        n.term = Some(term);
        n.index_leg.index_term = index_term;
        if let Some(notional) = notional {
            n.notional = Some(notional);
        }
    }
    let core = ctx.finish(end);
    Ok(PriceableAsset::Swap(
        SwapAsset::new(core, kind, start, dates, index_term, margin_leg.day_count).inverted(inverted),
    ))
}

/// Contract code of a commodity future: the second `.` field of `ExtraItem`,
/// or the template's code when there is none.
fn commodity_code(extra_item: &str, template_code: &str) -> String {
    extra_item
        .split('.')
        .nth(1)
        .filter(|c| !c.is_empty())
        .unwrap_or(template_code)
        .to_uppercase()
}

/// Rate futures, options on them and commodity futures.
///
/// Commodity futures dispatch on exchange first: anything on `XLME` is an
/// LME contract. Elsewhere the contract code decides.
pub(crate) fn future(mut ctx: BuildContext<'_>) -> ConstructionResult<PriceableAsset> {
    let extra_item = ctx.text(keys::EXTRA_ITEM)?.to_string();
    let expiry_code = ctx.text(keys::EXPIRY_CODE)?.to_string();
    let last_trading = last_trading_date_from_code(&expiry_code, ctx.base_date)?;
    let fixing = Arc::clone(&ctx.fixing);

    let node = match ctx.draft.node() {
        InstrumentNode::Future(n) => n.clone(),
        _ => return Err(ctx.mismatch()),
    };

    let (contract, accrual_end) = match ctx.asset_type {
        AssetType::IRFuture => (
            FutureContract::RateFuture,
            fixing.advance(last_trading, node.underlying_term, node.fixing_offset.convention)?,
        ),
        AssetType::IRFutureOption | AssetType::IRPutFutureOption | AssetType::IRCallFutureOption => {
            let option_type = match ctx.asset_type {
                AssetType::IRPutFutureOption => OptionType::Put,
                AssetType::IRCallFutureOption => OptionType::Call,
                _ => ctx
                    .props
                    .get_str(keys::OPTION_TYPE)
                    .and_then(OptionType::from_name)
                    .unwrap_or(OptionType::Put),
            };
            let contract = FutureContract::RateFutureOption {
                option_type,
                strike: strike(&ctx)?,
            };
            let end = fixing.advance(last_trading, node.underlying_term, node.fixing_offset.convention)?;
            (contract, end)
        }
        _ => {
            let contract = if node.exchange.eq_ignore_ascii_case("XLME") {
                FutureContract::Lme
            } else {
                match commodity_code(&extra_item, &node.contract_code).as_str() {
                    "W" => FutureContract::Wheat,
                    "CER" => FutureContract::CarbonEmissionReduction,
                    "B" => FutureContract::IceBrent,
                    other => {
                        return Err(ConstructionError::UnsupportedFuturesCode {
                            exchange: node.exchange.clone(),
                            code: other.to_string(),
                        })
                    }
                }
            };
            (contract, last_trading)
        }
    };

    let position = ctx
        .props
        .get_decimal(keys::POSITION)
        .or(ctx.notional)
        .unwrap_or(Decimal::ONE);
    ctx.notional = Some(position);
    let spread = ctx.asset_type == AssetType::CommodityFutureSpread;
    let code = if contract.is_rate() {
        node.contract_code.clone()
    } else {
        commodity_code(&extra_item, &node.contract_code)
    };
    let core = ctx.finish(last_trading);
    let asset = FutureAsset::new(
        core,
        contract,
        node.exchange,
        code,
        last_trading,
        accrual_end,
        node.contract_size,
        node.day_count,
    );
    Ok(PriceableAsset::Future(if spread { asset.as_spread() } else { asset }))
}

/// Bonds, bond spot and bond forwards.
pub(crate) fn bond(mut ctx: BuildContext<'_>) -> ConstructionResult<PriceableAsset> {
    let coupon = ctx.decimal(keys::COUPON)?;
    let maturity = ctx.date(keys::MATURITY)?;
    let forward_term = if ctx.asset_type == AssetType::BondForward {
        ctx.optional_period(keys::EXTRA_ITEM)?
    } else {
        None
    };
    let fixing = Arc::clone(&ctx.fixing);
    let payment = Arc::clone(&ctx.payment);

    let node = match ctx.draft.node() {
        InstrumentNode::Bond(n) => n.clone(),
        _ => return Err(ctx.mismatch()),
    };
    let settlement = ctx.offset_date(fixing.as_ref(), &node.settlement_date)?;
    if maturity <= settlement {
        return Err(ConstructionError::invalid_property(
            keys::MATURITY,
            format!("{maturity} is not after settlement {settlement}"),
        ));
    }
    let forward_date = match forward_term {
        Some(term) => Some(payment.advance(settlement, term, node.payment_adjustments.convention)?),
        None => None,
    };
    let coupon_dates = payment_schedule(settlement, maturity, node.coupon_frequency)?;
    let face_amount = match ctx.notional {
        Some(notional) if !notional.is_zero() => notional,
        _ => node.face_amount,
    };
    ctx.notional = Some(face_amount);

    if let InstrumentNode::Bond(n) = ctx.draft.node_mut() {
        n.coupon_rate = Some(coupon);
        n.maturity = Some(maturity);
        n.face_amount = face_amount;
        n.forward_term = forward_term;
    }
    let risk_maturity = forward_date.unwrap_or(maturity);
    let core = ctx.finish(risk_maturity);
    Ok(PriceableAsset::Bond(BondAsset::new(
        core,
        settlement,
        maturity,
        coupon,
        coupon_dates,
        face_amount,
        node.day_count,
        forward_date,
    )))
}

/// FX spot and forwards, including the overnight and tom-next swaps.
pub(crate) fn fx(mut ctx: BuildContext<'_>) -> ConstructionResult<PriceableAsset> {
    let term_text = ctx.text(keys::TERM)?.to_uppercase();
    let fixing = Arc::clone(&ctx.fixing);

    let node = match ctx.draft.node() {
        InstrumentNode::Fx(n) => n.clone(),
        _ => return Err(ctx.mismatch()),
    };
    let counter: Option<Currency> = match ctx.props.get_str(keys::CURRENCY2) {
        Some(code) => Some(code.parse()?),
        None => node.counter_currency,
    };
    let spot = ctx.offset_date(fixing.as_ref(), &node.spot_offset)?;

    let (kind, value_date, forward_term) = if ctx.asset_type == AssetType::FxSpot {
        (FxKind::Spot, spot, None)
    } else {
        match term_text.as_str() {
            "ON" => (FxKind::Overnight, fixing.add_business_days(ctx.base_date, 1), None),
            "TN" => (FxKind::TomNext, fixing.add_business_days(ctx.base_date, 2), None),
            "SP" | "SPOT" => (FxKind::Spot, spot, None),
            _ => {
                let term = ctx.period(keys::TERM)?;
                let value = fixing.advance(spot, term, node.spot_offset.convention)?;
                (FxKind::Forward, value, Some(term))
            }
        }
    };

    if let InstrumentNode::Fx(n) = ctx.draft.node_mut() {
        n.forward_term = forward_term;
        n.counter_currency = counter;
    }
    let core = ctx.finish(value_date);
    Ok(PriceableAsset::Fx(FxAsset::new(core, kind, counter, value_date)))
}

/// Commodity spot, forwards, average forwards and spreads.
pub(crate) fn commodity(mut ctx: BuildContext<'_>) -> ConstructionResult<PriceableAsset> {
    let expiry_term = ctx.optional_period(keys::EXPIRY_TERM)?;
    let averaging_term = ctx.optional_period(keys::UNDERLYING_TENOR)?;
    let fixing = Arc::clone(&ctx.fixing);

    let node = match ctx.draft.node() {
        InstrumentNode::Commodity(n) => n.clone(),
        _ => return Err(ctx.mismatch()),
    };
    let spot = ctx.offset_date(fixing.as_ref(), &node.spot_offset)?;
    let delivery = match expiry_term {
        Some(term) => fixing.advance(spot, term, node.spot_offset.convention)?,
        None => spot,
    };
    let kind = match ctx.asset_type {
        AssetType::CommoditySpot => CommodityKind::Spot,
        AssetType::CommodityAverageForward => CommodityKind::AverageForward,
        AssetType::CommoditySpread => CommodityKind::Spread,
        _ => CommodityKind::Forward,
    };
    let averaging_start = match (kind, averaging_term.or(node.averaging_term)) {
        (CommodityKind::AverageForward, Some(tenor)) => Some(delivery.add_period(Period::new(
            -tenor.multiplier,
            tenor.unit,
        ))?),
        _ => None,
    };
    let commodity = if node.commodity.is_empty() {
        ctx.props.get_str(keys::EXTRA_ITEM).unwrap_or_default().to_string()
    } else {
        node.commodity.clone()
    };

    if let InstrumentNode::Commodity(n) = ctx.draft.node_mut() {
        n.expiry_term = expiry_term;
        n.averaging_term = averaging_term.or(n.averaging_term);
    }
    let core = ctx.finish(delivery);
    Ok(PriceableAsset::Commodity(CommodityAsset::new(
        core,
        kind,
        commodity,
        delivery,
        averaging_start,
    )))
}

/// Equity spot and forwards. A forward settles its expiry term after spot.
pub(crate) fn equity(mut ctx: BuildContext<'_>) -> ConstructionResult<PriceableAsset> {
    let forward_term = if ctx.asset_type == AssetType::EquityForward {
        Some(ctx.period(keys::EXPIRY_TERM)?)
    } else {
        None
    };
    let fixing = Arc::clone(&ctx.fixing);
    let payment = Arc::clone(&ctx.payment);

    let node = match ctx.draft.node() {
        InstrumentNode::Equity(n) => n.clone(),
        _ => return Err(ctx.mismatch()),
    };
    let spot = ctx.offset_date(fixing.as_ref(), &node.settlement_offset)?;
    let settlement = match forward_term {
        Some(term) => payment.advance(spot, term, node.payment_adjustments.convention)?,
        None => spot,
    };

    if let InstrumentNode::Equity(n) = ctx.draft.node_mut() {
        n.forward_term = forward_term;
    }
    let core = ctx.finish(settlement);
    Ok(PriceableAsset::Equity(EquityAsset::new(core, settlement, forward_term.is_some())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commodity_code() {
        assert_eq!(commodity_code("CBOT.W", "X"), "W");
        assert_eq!(commodity_code("ice.b", "X"), "B");
        assert_eq!(commodity_code("Wheat", "cer"), "CER");
        assert_eq!(commodity_code("Wheat.", "W"), "W");
    }
}
