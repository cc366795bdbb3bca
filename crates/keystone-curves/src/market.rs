//! Named collections of loaded curves.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{CurveError, CurveResult};
use crate::structure::PricingStructure;

/// Curves loaded for one market, keyed by curve id.
#[derive(Debug, Clone, Default)]
pub struct MarketEnvironment {
    id: String,
    structures: BTreeMap<String, Arc<PricingStructure>>,
}

impl MarketEnvironment {
    /// Creates an empty environment.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            structures: BTreeMap::new(),
        }
    }

    /// Environment id, usually the market name.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Adds or replaces a curve.
    pub fn add_pricing_structure(&mut self, name: impl Into<String>, structure: Arc<PricingStructure>) {
        self.structures.insert(name.into(), structure);
    }

    /// Curve stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<PricingStructure>> {
        self.structures.get(name)
    }

    /// As [`get`](Self::get), failing with `CurveNotFound`.
    pub fn require(&self, name: &str) -> CurveResult<&Arc<PricingStructure>> {
        self.get(name).ok_or_else(|| CurveError::CurveNotFound {
            namespace: self.id.clone(),
            curve_id: name.to_string(),
        })
    }

    /// Number of curves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.structures.len()
    }

    /// True when no curves are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    /// Curves in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<PricingStructure>)> {
        self.structures.iter().map(|(k, v)| (k.as_str(), v))
    }
}
