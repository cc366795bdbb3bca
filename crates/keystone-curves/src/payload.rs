//! Stored curve data: pillars on a year-fraction axis.

use keystone_core::types::{Currency, Date};
use serde::{Deserialize, Serialize};

/// What a curve's pillar values represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveValueKind {
    /// Continuously compounded zero rates.
    ZeroRate,
    /// Discount factors.
    DiscountFactor,
    /// Forward prices or FX forward rates.
    Forward,
    /// Volatilities.
    Volatility,
    /// Additive spreads over a reference curve.
    Spread,
}

/// One curve point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePillar {
    /// Time from the base date in years (Act/365F).
    pub time: f64,
    /// Value at `time`.
    pub value: f64,
}

/// The serialized form of a curve as written to the store.
///
/// Derived curves store only their own spread pillars; the curves they are
/// composed over are stored separately and named in the item's properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePayload {
    /// Curve base date.
    pub base_date: Date,
    /// Currency of the curve, if it has one.
    #[serde(default)]
    pub currency: Option<Currency>,
    /// What the pillar values represent.
    pub kind: CurveValueKind,
    /// Points ordered by strictly increasing time.
    pub pillars: Vec<CurvePillar>,
}

impl CurvePayload {
    /// Creates a payload from `(time, value)` pairs.
    #[must_use]
    pub fn new(base_date: Date, kind: CurveValueKind, points: &[(f64, f64)]) -> Self {
        Self {
            base_date,
            currency: None,
            kind,
            pillars: points.iter().map(|&(time, value)| CurvePillar { time, value }).collect(),
        }
    }

    /// Sets the curve currency.
    #[must_use]
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    /// Checks the pillars: at least one, finite, non-negative and strictly
    /// increasing in time.
    pub fn validate(&self) -> Result<(), String> {
        if self.pillars.is_empty() {
            return Err("curve has no pillars".to_string());
        }
        for (i, p) in self.pillars.iter().enumerate() {
            if !p.time.is_finite() || !p.value.is_finite() {
                return Err(format!("pillar {i} is not finite"));
            }
            if p.time < 0.0 {
                return Err(format!("pillar {i} has negative time {}", p.time));
            }
        }
        if let Some(i) = self.pillars.windows(2).position(|w| w[1].time <= w[0].time) {
            return Err(format!(
                "non-monotonic pillar times at index {}: {:.4} >= {:.4}",
                i + 1,
                self.pillars[i].time,
                self.pillars[i + 1].time
            ));
        }
        Ok(())
    }

    /// Pillar times.
    #[must_use]
    pub fn times(&self) -> Vec<f64> {
        self.pillars.iter().map(|p| p.time).collect()
    }

    /// Linearly interpolated value at `t`, flat beyond the first and last
    /// pillars. Zero when there are no pillars.
    #[must_use]
    pub fn value_at(&self, t: f64) -> f64 {
        let (first, last) = match (self.pillars.first(), self.pillars.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }
        let upper = self.pillars.partition_point(|p| p.time < t);
        let (lo, hi) = (self.pillars[upper - 1], self.pillars[upper]);
        let w = (t - lo.time) / (hi.time - lo.time);
        lo.value + w * (hi.value - lo.value)
    }
}
