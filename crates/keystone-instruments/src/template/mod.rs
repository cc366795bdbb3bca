//! Instrument configuration templates.
//!
//! A template carries everything about an instrument that does not come from
//! its identifier: spot lags, day counts, business centers, leg frequencies,
//! exchange and contract codes. Templates live in the object store and are
//! shared as `Arc<InstrumentTemplate>`; they have no setters. Per-asset fields
//! are written on a [`TemplateDraft`], which is an owned copy.

mod store;

pub use store::{template_id, TemplateStore, CONFIGURATION_PREFIX};

use keystone_core::calendars::{BusinessCenters, BusinessDayConvention};
use keystone_core::daycounts::DayCountFraction;
use keystone_core::types::{Currency, Date, Period};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A business-day offset from a reference date, e.g. the spot lag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeDateOffset {
    /// Offset tenor. Day tenors count business days.
    pub period: Period,
    /// Centers whose holidays apply.
    pub business_centers: BusinessCenters,
    /// Adjustment applied after rolling.
    pub convention: BusinessDayConvention,
}

impl RelativeDateOffset {
    /// Creates an offset.
    #[must_use]
    pub fn new(period: Period, business_centers: BusinessCenters, convention: BusinessDayConvention) -> Self {
        Self {
            period,
            business_centers,
            convention,
        }
    }
}

/// How payment dates are adjusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDayAdjustments {
    /// Adjustment convention.
    pub convention: BusinessDayConvention,
    /// Centers whose holidays apply.
    pub business_centers: BusinessCenters,
}

impl BusinessDayAdjustments {
    /// Creates adjustments.
    #[must_use]
    pub fn new(convention: BusinessDayConvention, business_centers: BusinessCenters) -> Self {
        Self {
            convention,
            business_centers,
        }
    }
}

/// Deposits, bills, repos and FRAs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositNode {
    /// Deposit term, written per asset.
    pub term: Option<Period>,
    /// Forward start of FRA-style assets, written per asset.
    pub start_term: Option<Period>,
    /// Spot lag from the base date.
    pub spot_offset: RelativeDateOffset,
    /// Payment adjustments.
    pub payment_adjustments: BusinessDayAdjustments,
    /// Accrual day count.
    pub day_count: DayCountFraction,
}

/// Rate indices: Xibor, OIS and inflation indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateIndexNode {
    /// Index name, e.g. `AUD-BBR-BBSW`.
    pub index_name: String,
    /// Index tenor, written per asset.
    pub term: Option<Period>,
    /// Fixing lag.
    pub fixing_offset: RelativeDateOffset,
    /// Payment adjustments.
    pub payment_adjustments: BusinessDayAdjustments,
    /// Accrual day count.
    pub day_count: DayCountFraction,
}

/// Zero-coupon rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZeroRateNode {
    /// Term, written per asset.
    pub term: Option<Period>,
    /// Compounding frequency; `None` means continuous.
    pub compounding_frequency: Option<Period>,
    /// Adjustment of the maturity date.
    pub adjustments: BusinessDayAdjustments,
    /// Day count.
    pub day_count: DayCountFraction,
}

/// Single-curve swaps: vanilla, OIS, cleared and inflation swaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapNode {
    /// Swap term, written per asset.
    pub term: Option<Period>,
    /// Floating index tenor, overridden by the identifier when present.
    pub index_term: Option<Period>,
    /// Fixed leg payment frequency.
    pub fixed_frequency: Period,
    /// Spot lag.
    pub spot_offset: RelativeDateOffset,
    /// Payment adjustments.
    pub payment_adjustments: BusinessDayAdjustments,
    /// Fixed leg day count.
    pub day_count: DayCountFraction,
    /// Notional, written per asset.
    pub notional: Option<Decimal>,
}

/// One leg of a basis swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegSpec {
    /// Payment frequency.
    pub payment_frequency: Period,
    /// Floating index tenor.
    pub index_term: Option<Period>,
    /// Accrual day count.
    pub day_count: DayCountFraction,
    /// Leg currency for cross-currency swaps.
    pub currency: Option<Currency>,
}

/// Two floating legs, the margin leg carrying the quoted spread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasisSwapNode {
    /// Swap term, written per asset.
    pub term: Option<Period>,
    /// Leg the spread is paid on.
    pub margin_leg: LegSpec,
    /// Reference leg.
    pub index_leg: LegSpec,
    /// Spot lag.
    pub spot_offset: RelativeDateOffset,
    /// Payment adjustments.
    pub payment_adjustments: BusinessDayAdjustments,
    /// Whether notionals reset to the FX rate each period.
    pub resettable: bool,
    /// Notional, written per asset.
    pub notional: Option<Decimal>,
}

/// Caplets, floorlets, caps and floors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateOptionNode {
    /// Forward start of a caplet, or the cap term, written per asset.
    pub term: Option<Period>,
    /// Underlying index tenor.
    pub index_term: Option<Period>,
    /// Strike, written per asset when supplied.
    pub strike: Option<Decimal>,
    /// Fixing lag.
    pub fixing_offset: RelativeDateOffset,
    /// Payment adjustments.
    pub payment_adjustments: BusinessDayAdjustments,
    /// Accrual day count.
    pub day_count: DayCountFraction,
    /// Notional, written per asset.
    pub notional: Option<Decimal>,
}

/// Exchange-traded futures and options on futures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FutureNode {
    /// Exchange MIC, e.g. `XSFE` or `XLME`.
    pub exchange: String,
    /// Contract code, e.g. `IR`, `W`, `B`.
    pub contract_code: String,
    /// Underlying deposit tenor of a rate future.
    pub underlying_term: Period,
    /// Contract size.
    pub contract_size: Decimal,
    /// Fixing offset of the underlying.
    pub fixing_offset: RelativeDateOffset,
    /// Day count of the underlying.
    pub day_count: DayCountFraction,
}

/// Fixed-coupon bonds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondNode {
    /// Settlement lag.
    pub settlement_date: RelativeDateOffset,
    /// Coupon payment frequency.
    pub coupon_frequency: Period,
    /// Coupon as a decimal rate, written per asset.
    pub coupon_rate: Option<Decimal>,
    /// Maturity date, written per asset.
    pub maturity: Option<Date>,
    /// Face amount, written per asset when a notional is supplied.
    pub face_amount: Decimal,
    /// Coupon day count.
    pub day_count: DayCountFraction,
    /// Payment adjustments.
    pub payment_adjustments: BusinessDayAdjustments,
    /// Forward settlement term of a bond forward, written per asset.
    pub forward_term: Option<Period>,
}

/// FX spot and forwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FxNode {
    /// Counter currency when the identifier does not carry a pair.
    pub counter_currency: Option<Currency>,
    /// Spot lag.
    pub spot_offset: RelativeDateOffset,
    /// Forward tenor, written per asset.
    pub forward_term: Option<Period>,
}

/// Commodity spot, forwards and spreads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommodityNode {
    /// Commodity name.
    pub commodity: String,
    /// Spot lag.
    pub spot_offset: RelativeDateOffset,
    /// Expiry tenor, written per asset.
    pub expiry_term: Option<Period>,
    /// Averaging tenor of an average forward.
    pub averaging_term: Option<Period>,
}

/// Equity spot and forwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityNode {
    /// Settlement lag.
    pub settlement_offset: RelativeDateOffset,
    /// Forward settlement tenor, written per asset.
    pub forward_term: Option<Period>,
    /// Payment adjustments.
    pub payment_adjustments: BusinessDayAdjustments,
}

/// The instrument-specific part of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape")]
#[allow(missing_docs)]
pub enum InstrumentNode {
    Deposit(DepositNode),
    RateIndex(RateIndexNode),
    ZeroRate(ZeroRateNode),
    Swap(SwapNode),
    BasisSwap(BasisSwapNode),
    RateOption(RateOptionNode),
    Future(FutureNode),
    Bond(BondNode),
    Fx(FxNode),
    Commodity(CommodityNode),
    Equity(EquityNode),
}

/// Discriminant of [`InstrumentNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum NodeShape {
    Deposit,
    RateIndex,
    ZeroRate,
    Swap,
    BasisSwap,
    RateOption,
    Future,
    Bond,
    Fx,
    Commodity,
    Equity,
}

impl fmt::Display for NodeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl InstrumentNode {
    /// The node's shape.
    #[must_use]
    pub fn shape(&self) -> NodeShape {
        match self {
            InstrumentNode::Deposit(_) => NodeShape::Deposit,
            InstrumentNode::RateIndex(_) => NodeShape::RateIndex,
            InstrumentNode::ZeroRate(_) => NodeShape::ZeroRate,
            InstrumentNode::Swap(_) => NodeShape::Swap,
            InstrumentNode::BasisSwap(_) => NodeShape::BasisSwap,
            InstrumentNode::RateOption(_) => NodeShape::RateOption,
            InstrumentNode::Future(_) => NodeShape::Future,
            InstrumentNode::Bond(_) => NodeShape::Bond,
            InstrumentNode::Fx(_) => NodeShape::Fx,
            InstrumentNode::Commodity(_) => NodeShape::Commodity,
            InstrumentNode::Equity(_) => NodeShape::Equity,
        }
    }

    /// Centers of the fixing or spot calendar.
    #[must_use]
    pub fn fixing_centers(&self) -> Option<&BusinessCenters> {
        match self {
            InstrumentNode::Deposit(n) => Some(&n.spot_offset.business_centers),
            InstrumentNode::RateIndex(n) => Some(&n.fixing_offset.business_centers),
            InstrumentNode::ZeroRate(_) => None,
            InstrumentNode::Swap(n) => Some(&n.spot_offset.business_centers),
            InstrumentNode::BasisSwap(n) => Some(&n.spot_offset.business_centers),
            InstrumentNode::RateOption(n) => Some(&n.fixing_offset.business_centers),
            InstrumentNode::Future(n) => Some(&n.fixing_offset.business_centers),
            InstrumentNode::Bond(n) => Some(&n.settlement_date.business_centers),
            InstrumentNode::Fx(n) => Some(&n.spot_offset.business_centers),
            InstrumentNode::Commodity(n) => Some(&n.spot_offset.business_centers),
            InstrumentNode::Equity(n) => Some(&n.settlement_offset.business_centers),
        }
    }

    /// Centers of the payment calendar.
    #[must_use]
    pub fn payment_centers(&self) -> Option<&BusinessCenters> {
        match self {
            InstrumentNode::Deposit(n) => Some(&n.payment_adjustments.business_centers),
            InstrumentNode::RateIndex(n) => Some(&n.payment_adjustments.business_centers),
            InstrumentNode::ZeroRate(n) => Some(&n.adjustments.business_centers),
            InstrumentNode::Swap(n) => Some(&n.payment_adjustments.business_centers),
            InstrumentNode::BasisSwap(n) => Some(&n.payment_adjustments.business_centers),
            InstrumentNode::RateOption(n) => Some(&n.payment_adjustments.business_centers),
            InstrumentNode::Bond(n) => Some(&n.payment_adjustments.business_centers),
            InstrumentNode::Equity(n) => Some(&n.payment_adjustments.business_centers),
            InstrumentNode::Future(_) | InstrumentNode::Fx(_) | InstrumentNode::Commodity(_) => None,
        }
    }
}

/// A shared, read-only instrument configuration.
///
/// There is no `&mut` access: call [`InstrumentTemplate::to_draft`]
/// to obtain an owned copy that can be customised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentTemplate {
    id: String,
    currency: Currency,
    node: InstrumentNode,
}

impl InstrumentTemplate {
    /// Creates a template.
    #[must_use]
    pub fn new(id: impl Into<String>, currency: Currency, node: InstrumentNode) -> Self {
        Self {
            id: id.into(),
            currency,
            node,
        }
    }

    /// Instrument id. For a stored template this is the configuration id; on a
    /// built asset it is the asset id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Template currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Instrument-specific configuration.
    #[must_use]
    pub fn node(&self) -> &InstrumentNode {
        &self.node
    }

    /// Shape of [`Self::node`].
    #[must_use]
    pub fn shape(&self) -> NodeShape {
        self.node.shape()
    }

    /// Clones into an editable draft.
    #[must_use]
    pub fn to_draft(&self) -> TemplateDraft {
        TemplateDraft {
            id: self.id.clone(),
            currency: self.currency,
            node: self.node.clone(),
        }
    }
}

/// An owned, editable copy of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDraft {
    id: String,
    currency: Currency,
    node: InstrumentNode,
}

impl TemplateDraft {
    /// Sets the instrument id.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Current id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Read access to the node.
    #[must_use]
    pub fn node(&self) -> &InstrumentNode {
        &self.node
    }

    /// Write access to the node.
    pub fn node_mut(&mut self) -> &mut InstrumentNode {
        &mut self.node
    }

    /// Finishes editing.
    #[must_use]
    pub fn freeze(self) -> InstrumentTemplate {
        InstrumentTemplate {
            id: self.id,
            currency: self.currency,
            node: self.node,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Templates used across the crate's unit tests.

    use super::*;
    use keystone_core::types::PeriodUnit;
    use rust_decimal_macros::dec;

    pub fn centers() -> BusinessCenters {
        BusinessCenters::parse("AUSY")
    }

    pub fn spot() -> RelativeDateOffset {
        RelativeDateOffset::new(Period::new(0, PeriodUnit::Day), centers(), BusinessDayConvention::Following)
    }

    pub fn adjustments() -> BusinessDayAdjustments {
        BusinessDayAdjustments::new(BusinessDayConvention::ModifiedFollowing, centers())
    }

    pub fn deposit() -> InstrumentTemplate {
        InstrumentTemplate::new(
            "AUD-Deposit",
            Currency::AUD,
            InstrumentNode::Deposit(DepositNode {
                term: None,
                start_term: None,
                spot_offset: spot(),
                payment_adjustments: adjustments(),
                day_count: DayCountFraction::Act365Fixed,
            }),
        )
    }

    pub fn swap() -> InstrumentTemplate {
        InstrumentTemplate::new(
            "AUD-IRSwap",
            Currency::AUD,
            InstrumentNode::Swap(SwapNode {
                term: None,
                index_term: Some(Period::new(6, PeriodUnit::Month)),
                fixed_frequency: Period::new(6, PeriodUnit::Month),
                spot_offset: spot(),
                payment_adjustments: adjustments(),
                day_count: DayCountFraction::Act365Fixed,
                notional: None,
            }),
        )
    }

    pub fn bond() -> InstrumentTemplate {
        InstrumentTemplate::new(
            "AUD-Bond",
            Currency::AUD,
            InstrumentNode::Bond(BondNode {
                settlement_date: RelativeDateOffset::new(
                    Period::new(3, PeriodUnit::Day),
                    BusinessCenters::parse("AUSY"),
                    BusinessDayConvention::Following,
                ),
                coupon_frequency: Period::new(6, PeriodUnit::Month),
                coupon_rate: None,
                maturity: None,
                face_amount: dec!(100),
                day_count: DayCountFraction::Act365Fixed,
                payment_adjustments: BusinessDayAdjustments::new(
                    BusinessDayConvention::Following,
                    BusinessCenters::parse("AUME"),
                ),
                forward_term: None,
            }),
        )
    }
}
