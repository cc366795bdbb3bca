//! Loaded pricing structures, outright or composed over reference curves.

use std::sync::Arc;

use keystone_core::daycounts::DayCountFraction;
use keystone_core::traits::MarketData;
use keystone_core::types::{Date, Properties};
use rust_decimal::prelude::ToPrimitive;

use crate::payload::{CurvePayload, CurveValueKind};
use crate::structure_type::{PricingStructureType, BOOTSTRAP};

/// A pricing structure ready for use.
///
/// Derived curves hold their references as `Arc`s, so a curve referenced
/// twice in one load is shared rather than copied.
#[derive(Debug, Clone)]
pub enum PricingStructure {
    /// Outright curve deserialized from its own payload.
    Simple(SimpleCurve),
    /// Spread over one reference curve.
    Basis(BasisCurve),
    /// Cross-currency basis: spread over a base curve, with the FX curve and
    /// the second-currency curve it was calibrated against.
    Xccy(XccyCurve),
}

/// An outright curve.
#[derive(Debug, Clone)]
pub struct SimpleCurve {
    id: String,
    structure_type: PricingStructureType,
    properties: Properties,
    payload: CurvePayload,
}

impl SimpleCurve {
    /// Creates an outright curve.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        structure_type: PricingStructureType,
        properties: Properties,
        payload: CurvePayload,
    ) -> Self {
        Self {
            id: id.into(),
            structure_type,
            properties,
            payload,
        }
    }

    /// Stored pillars.
    #[must_use]
    pub fn payload(&self) -> &CurvePayload {
        &self.payload
    }
}

/// A basis curve composed over its reference.
#[derive(Debug, Clone)]
pub struct BasisCurve {
    id: String,
    properties: Properties,
    reference: Arc<PricingStructure>,
    spread: CurvePayload,
}

impl BasisCurve {
    /// Composes `spread` over `reference`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        properties: Properties,
        reference: Arc<PricingStructure>,
        spread: CurvePayload,
    ) -> Self {
        Self {
            id: id.into(),
            properties,
            reference,
            spread,
        }
    }

    /// The reference curve.
    #[must_use]
    pub fn reference(&self) -> &Arc<PricingStructure> {
        &self.reference
    }

    /// Spread pillars.
    #[must_use]
    pub fn spread(&self) -> &CurvePayload {
        &self.spread
    }
}

/// A cross-currency basis curve composed over its three references.
#[derive(Debug, Clone)]
pub struct XccyCurve {
    id: String,
    properties: Properties,
    base: Arc<PricingStructure>,
    fx: Arc<PricingStructure>,
    currency2: Arc<PricingStructure>,
    spread: CurvePayload,
}

impl XccyCurve {
    /// Composes `spread` over the base curve, with the FX and second-currency
    /// curves attached.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        properties: Properties,
        base: Arc<PricingStructure>,
        fx: Arc<PricingStructure>,
        currency2: Arc<PricingStructure>,
        spread: CurvePayload,
    ) -> Self {
        Self {
            id: id.into(),
            properties,
            base,
            fx,
            currency2,
            spread,
        }
    }

    /// Base rate curve.
    #[must_use]
    pub fn base(&self) -> &Arc<PricingStructure> {
        &self.base
    }

    /// FX curve.
    #[must_use]
    pub fn fx(&self) -> &Arc<PricingStructure> {
        &self.fx
    }

    /// Second-currency rate curve.
    #[must_use]
    pub fn currency2(&self) -> &Arc<PricingStructure> {
        &self.currency2
    }

    /// Spread pillars.
    #[must_use]
    pub fn spread(&self) -> &CurvePayload {
        &self.spread
    }
}

impl PricingStructure {
    /// Store id of the curve.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Simple(c) => &c.id,
            Self::Basis(c) => &c.id,
            Self::Xccy(c) => &c.id,
        }
    }

    /// Declared structure type.
    #[must_use]
    pub fn structure_type(&self) -> PricingStructureType {
        match self {
            Self::Simple(c) => c.structure_type,
            Self::Basis(_) => PricingStructureType::RateBasisCurve,
            Self::Xccy(_) => PricingStructureType::RateXccyCurve,
        }
    }

    /// Properties the curve was stored with, plus any set at load time.
    #[must_use]
    pub fn properties(&self) -> &Properties {
        match self {
            Self::Simple(c) => &c.properties,
            Self::Basis(c) => &c.properties,
            Self::Xccy(c) => &c.properties,
        }
    }

    /// The curve's own payload: pillars for an outright curve, spreads for a
    /// derived one.
    #[must_use]
    pub fn payload(&self) -> &CurvePayload {
        match self {
            Self::Simple(c) => &c.payload,
            Self::Basis(c) => &c.spread,
            Self::Xccy(c) => &c.spread,
        }
    }

    /// True when the curve was loaded with a forced bootstrap.
    #[must_use]
    pub fn needs_bootstrap(&self) -> bool {
        self.properties().get_bool(BOOTSTRAP).unwrap_or(false)
    }

    /// Directly referenced curves, in composition order.
    #[must_use]
    pub fn references(&self) -> Vec<&Arc<PricingStructure>> {
        match self {
            Self::Simple(_) => Vec::new(),
            Self::Basis(c) => vec![&c.reference],
            Self::Xccy(c) => vec![&c.base, &c.fx, &c.currency2],
        }
    }

    /// Value at `t` years: the pillar lookup for an outright curve, the base
    /// value plus spread for a derived one.
    #[must_use]
    pub fn value_at_time(&self, t: f64) -> f64 {
        match self {
            Self::Simple(c) => c.payload.value_at(t),
            Self::Basis(c) => c.reference.value_at_time(t) + c.spread.value_at(t),
            Self::Xccy(c) => c.base.value_at_time(t) + c.spread.value_at(t),
        }
    }

    /// Value at `date`.
    #[must_use]
    pub fn value_at(&self, date: Date) -> f64 {
        self.value_at_time(self.time_to(date))
    }

    /// Continuously compounded zero rate at `t`, when the curve is a rate
    /// curve.
    #[must_use]
    pub fn zero_rate_at_time(&self, t: f64) -> Option<f64> {
        match self {
            Self::Simple(c) => match c.payload.kind {
                CurveValueKind::ZeroRate => Some(c.payload.value_at(t)),
                CurveValueKind::DiscountFactor => {
                    let df = c.payload.value_at(t);
                    if df <= 0.0 {
                        None
                    } else if t <= 0.0 {
                        Some(0.0)
                    } else {
                        Some(-df.ln() / t)
                    }
                }
                _ => None,
            },
            Self::Basis(c) => Some(c.reference.zero_rate_at_time(t)? + c.spread.value_at(t)),
            Self::Xccy(c) => Some(c.base.zero_rate_at_time(t)? + c.spread.value_at(t)),
        }
    }

    /// Act/365F time from the base date to `date`.
    #[must_use]
    pub fn time_to(&self, date: Date) -> f64 {
        DayCountFraction::Act365Fixed
            .year_fraction(self.payload().base_date, date)
            .to_f64()
            .unwrap_or(0.0)
    }
}

impl MarketData for PricingStructure {
    fn base_date(&self) -> Date {
        self.payload().base_date
    }

    fn discount_factor(&self, date: Date) -> Option<f64> {
        let t = self.time_to(date);
        if let Self::Simple(c) = self {
            if c.payload.kind == CurveValueKind::DiscountFactor {
                return Some(c.payload.value_at(t));
            }
        }
        let zero = self.zero_rate_at_time(t)?;
        Some((-zero * t).exp())
    }

    fn forward_value(&self, date: Date) -> Option<f64> {
        match self {
            Self::Simple(c) if c.payload.kind == CurveValueKind::Forward => Some(self.value_at(date)),
            _ => None,
        }
    }
}
