//! Recursive curve loading.
//!
//! A stored curve declares its type in `PricingStructureType`. Outright
//! curves are deserialized directly. Basis and cross-currency curves name
//! their reference curves in properties; those are loaded first, recursively,
//! and the derived curve is composed over them.
//!
//! ```text
//! load(id) ─► Loading ─► outright? ──────────────────────► Composing ─► Resolved
//!                 │                                            ▲
//!                 └─► ResolvingReferences ─► load(ref) ... ────┘
//! ```
//!
//! Ids currently being resolved are tracked; meeting one again is a
//! [`CurveError::CyclicReference`]. A curve reached twice through different
//! branches (not an ancestor of itself) is loaded twice and is not a cycle.

use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use keystone_core::types::Properties;
use keystone_store::{Namespace, ObjectStore, PropertyFilter, StoreKey, StoredItem};
use tracing::{debug, info, warn};

use crate::error::{CurveError, CurveResult};
use crate::market::MarketEnvironment;
use crate::payload::CurvePayload;
use crate::structure::{BasisCurve, PricingStructure, SimpleCurve, XccyCurve};
use crate::structure_type::{PricingStructureType, BOOTSTRAP, PRICING_STRUCTURE_TYPE};

/// Progress of a single curve load, reported in debug traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveState {
    /// Reading the stored item.
    Loading,
    /// Loading the curves a derived curve is built on.
    ResolvingReferences,
    /// Building the structure from its payload and references.
    Composing,
    /// Ready for use.
    Resolved,
}

impl fmt::Display for ResolveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Loading => "Loading",
            Self::ResolvingReferences => "ResolvingReferences",
            Self::Composing => "Composing",
            Self::Resolved => "Resolved",
        };
        f.write_str(name)
    }
}

/// Loads curves from an [`ObjectStore`] within one namespace.
pub struct CurveResolver {
    store: Arc<dyn ObjectStore>,
    namespace: Namespace,
}

impl CurveResolver {
    /// Creates a resolver over `store`.
    pub fn new(store: Arc<dyn ObjectStore>, namespace: Namespace) -> Self {
        Self { store, namespace }
    }

    /// Namespace curves are read from and written to.
    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Loads `curve_id` together with everything it references.
    ///
    /// With `force_bootstrap` the returned curve carries `Bootstrap=true`;
    /// its references are loaded as stored.
    ///
    /// # Errors
    ///
    /// - `CurveNotFound` if the curve or any reference is absent
    /// - `UnknownStructureType` if a stored type is missing or unrecognised
    /// - `MissingReferenceCurve` if a derived curve omits a reference id
    /// - `CyclicReference` if a curve is reached again while loading itself
    /// - `Deserialization` if a payload is not a valid curve
    pub fn load(&self, curve_id: &str, force_bootstrap: bool) -> CurveResult<Arc<PricingStructure>> {
        let mut in_progress = Vec::new();
        self.resolve(curve_id, force_bootstrap, &mut in_progress)
    }

    fn resolve(
        &self,
        curve_id: &str,
        force_bootstrap: bool,
        in_progress: &mut Vec<String>,
    ) -> CurveResult<Arc<PricingStructure>> {
        if in_progress.iter().any(|id| id == curve_id) {
            let mut chain = in_progress.clone();
            chain.push(curve_id.to_string());
            let err = CurveError::CyclicReference { chain };
            warn!(curve_id, error = %err, "Curve load aborted");
            return Err(err);
        }

        trace_state(curve_id, ResolveState::Loading);
        let key = self.namespace.key(curve_id);
        let item = self.store.load_item(&key)?.ok_or_else(|| CurveError::CurveNotFound {
            namespace: self.namespace.to_string(),
            curve_id: curve_id.to_string(),
        })?;
        let StoredItem { data, mut properties, .. } = item;
        if force_bootstrap {
            properties.set(BOOTSTRAP, true);
        }

        let structure_type = structure_type(curve_id, &properties)?;
        let payload: CurvePayload =
            serde_json::from_value(data).map_err(|e| CurveError::deserialization(curve_id, e.to_string()))?;
        payload
            .validate()
            .map_err(|reason| CurveError::deserialization(curve_id, reason))?;

        if structure_type.is_outright() {
            trace_state(curve_id, ResolveState::Composing);
            let curve = SimpleCurve::new(curve_id, structure_type, properties, payload);
            trace_state(curve_id, ResolveState::Resolved);
            return Ok(Arc::new(PricingStructure::Simple(curve)));
        }

        trace_state(curve_id, ResolveState::ResolvingReferences);
        let reference_ids = structure_type
            .reference_keys()
            .iter()
            .map(|key| {
                properties
                    .get_str(key)
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .ok_or_else(|| CurveError::missing_reference(curve_id, *key))
            })
            .collect::<CurveResult<Vec<_>>>()?;

        in_progress.push(curve_id.to_string());
        let references = reference_ids
            .iter()
            .map(|id| self.resolve(id, false, in_progress))
            .collect::<CurveResult<Vec<_>>>();
        in_progress.pop();
        let references = references?;

        trace_state(curve_id, ResolveState::Composing);
        let structure = match (structure_type, references.as_slice()) {
            (PricingStructureType::RateBasisCurve, [reference]) => PricingStructure::Basis(BasisCurve::new(
                curve_id,
                properties,
                Arc::clone(reference),
                payload,
            )),
            (PricingStructureType::RateXccyCurve, [base, fx, currency2]) => PricingStructure::Xccy(XccyCurve::new(
                curve_id,
                properties,
                Arc::clone(base),
                Arc::clone(fx),
                Arc::clone(currency2),
                payload,
            )),
            (other, refs) => {
                return Err(CurveError::deserialization(
                    curve_id,
                    format!("{other} cannot be composed over {} references", refs.len()),
                ))
            }
        };
        trace_state(curve_id, ResolveState::Resolved);
        Ok(Arc::new(structure))
    }

    /// Loads every curve in `curve_ids` into one environment named `market`.
    ///
    /// Stops at the first curve that fails to load.
    pub fn load_market(
        &self,
        market: &str,
        curve_ids: &[&str],
        force_bootstrap: bool,
    ) -> CurveResult<MarketEnvironment> {
        let mut environment = MarketEnvironment::new(market);
        for id in curve_ids {
            let curve = self.load(id, force_bootstrap)?;
            environment.add_pricing_structure(*id, curve);
        }
        info!(
            market,
            namespace = %self.namespace,
            curves = environment.len(),
            "Market environment loaded"
        );
        Ok(environment)
    }

    /// Saves a curve payload.
    ///
    /// `properties` must carry a known `PricingStructureType`; derived types
    /// also need their reference ids, which are checked at load time.
    pub fn save_curve(
        &self,
        curve_id: &str,
        payload: &CurvePayload,
        properties: Properties,
        ttl: Option<Duration>,
    ) -> CurveResult<StoreKey> {
        let structure_type = structure_type(curve_id, &properties)?;
        let key = self.namespace.key(curve_id);
        let data = serde_json::to_value(payload).map_err(|e| CurveError::deserialization(curve_id, e.to_string()))?;
        self.store
            .save_item(StoredItem::new(key.clone(), data, properties).with_ttl(ttl))?;
        debug!(
            key = %key,
            structure_type = %structure_type,
            ttl_seconds = ttl.map(|t| t.num_seconds()),
            "Saved curve"
        );
        Ok(key)
    }

    /// Ids of the stored curves whose properties match `filter`.
    pub fn find_curves(&self, filter: &PropertyFilter) -> CurveResult<Vec<String>> {
        let mut ids: Vec<String> = self
            .store
            .query(&self.namespace, filter)?
            .into_iter()
            .filter(|item| item.properties.contains_key(PRICING_STRUCTURE_TYPE))
            .map(|item| item.key.id)
            .collect();
        ids.sort();
        Ok(ids)
    }
}

impl fmt::Debug for CurveResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurveResolver")
            .field("backend", &self.store.backend_name())
            .field("namespace", &self.namespace)
            .finish()
    }
}

fn trace_state(curve_id: &str, state: ResolveState) {
    debug!(curve_id, state = %state, "Curve resolution");
}

fn structure_type(curve_id: &str, properties: &Properties) -> CurveResult<PricingStructureType> {
    let value = properties.get_str(PRICING_STRUCTURE_TYPE).unwrap_or_default();
    PricingStructureType::from_name(value).ok_or_else(|| CurveError::UnknownStructureType {
        curve_id: curve_id.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::CurveValueKind;
    use crate::structure_type::{REFERENCE_CURRENCY2_CURVE_ID, REFERENCE_CURVE_UNIQUE_ID, REFERENCE_FX_CURVE_UNIQUE_ID};
    use approx::assert_relative_eq;
    use keystone_core::types::Date;
    use keystone_store::InMemoryStore;

    fn resolver() -> CurveResolver {
        CurveResolver::new(Arc::new(InMemoryStore::new()), Namespace::new("Test"))
    }

    fn base() -> Date {
        Date::from_ymd(2025, 1, 15).unwrap()
    }

    fn zero(points: &[(f64, f64)]) -> CurvePayload {
        CurvePayload::new(base(), CurveValueKind::ZeroRate, points)
    }

    fn spread(points: &[(f64, f64)]) -> CurvePayload {
        CurvePayload::new(base(), CurveValueKind::Spread, points)
    }

    fn typed(t: PricingStructureType) -> Properties {
        Properties::new().with(PRICING_STRUCTURE_TYPE, t.as_str())
    }

    #[test]
    fn test_load_outright() {
        let r = resolver();
        r.save_curve("RateCurve.AUD", &zero(&[(1.0, 0.04)]), typed(PricingStructureType::RateCurve), None)
            .unwrap();

        let curve = r.load("RateCurve.AUD", false).unwrap();
        assert_eq!(curve.id(), "RateCurve.AUD");
        assert_eq!(curve.structure_type(), PricingStructureType::RateCurve);
        assert!(curve.references().is_empty());
        assert!(!curve.needs_bootstrap());
    }

    #[test]
    fn test_not_found() {
        let err = resolver().load("Missing", false).unwrap_err();
        assert!(matches!(err, CurveError::CurveNotFound { ref curve_id, .. } if curve_id == "Missing"));
    }

    #[test]
    fn test_unknown_structure_type() {
        let r = resolver();
        let props = Properties::new().with(PRICING_STRUCTURE_TYPE, "Surface");
        let err = r.save_curve("X", &zero(&[(1.0, 0.04)]), props, None).unwrap_err();
        assert!(matches!(err, CurveError::UnknownStructureType { .. }));

        // Written behind the resolver's back, without a type.
        r.store
            .save_item(StoredItem::new(
                r.namespace.key("Untyped"),
                serde_json::to_value(zero(&[(1.0, 0.04)])).unwrap(),
                Properties::new(),
            ))
            .unwrap();
        let err = r.load("Untyped", false).unwrap_err();
        assert!(matches!(err, CurveError::UnknownStructureType { ref value, .. } if value.is_empty()));
    }

    #[test]
    fn test_bad_payload() {
        let r = resolver();
        r.store
            .save_item(StoredItem::new(
                r.namespace.key("Broken"),
                serde_json::json!({"pillars": "none"}),
                typed(PricingStructureType::RateCurve),
            ))
            .unwrap();
        assert!(matches!(r.load("Broken", false), Err(CurveError::Deserialization { .. })));

        r.save_curve("Empty", &zero(&[]), typed(PricingStructureType::RateCurve), None)
            .unwrap();
        assert!(matches!(r.load("Empty", false), Err(CurveError::Deserialization { .. })));
    }

    #[test]
    fn test_basis_without_reference() {
        let r = resolver();
        r.save_curve(
            "RateBasisCurve.AUD-3M",
            &spread(&[(1.0, 0.001)]),
            typed(PricingStructureType::RateBasisCurve),
            None,
        )
        .unwrap();

        let err = r.load("RateBasisCurve.AUD-3M", false).unwrap_err();
        assert!(matches!(
            err,
            CurveError::MissingReferenceCurve { ref property, .. } if property == REFERENCE_CURVE_UNIQUE_ID
        ));
    }

    #[test]
    fn test_basis_composes_over_reference() {
        let r = resolver();
        r.save_curve("RateCurve.AUD", &zero(&[(1.0, 0.04), (5.0, 0.05)]), typed(PricingStructureType::RateCurve), None)
            .unwrap();
        r.save_curve(
            "RateBasisCurve.AUD-3M",
            &spread(&[(1.0, 0.001), (5.0, 0.002)]),
            typed(PricingStructureType::RateBasisCurve).with(REFERENCE_CURVE_UNIQUE_ID, "RateCurve.AUD"),
            None,
        )
        .unwrap();

        let curve = r.load("RateBasisCurve.AUD-3M", false).unwrap();
        let PricingStructure::Basis(basis) = curve.as_ref() else {
            panic!("expected a basis curve");
        };
        assert_eq!(basis.reference().id(), "RateCurve.AUD");
        assert_relative_eq!(curve.value_at_time(5.0), 0.052, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_reference_target() {
        let r = resolver();
        r.save_curve(
            "Basis",
            &spread(&[(1.0, 0.001)]),
            typed(PricingStructureType::RateBasisCurve).with(REFERENCE_CURVE_UNIQUE_ID, "Nowhere"),
            None,
        )
        .unwrap();
        let err = r.load("Basis", false).unwrap_err();
        assert!(matches!(err, CurveError::CurveNotFound { ref curve_id, .. } if curve_id == "Nowhere"));
    }

    #[test]
    fn test_cycle_detected() {
        let r = resolver();
        let basis = |reference: &str| {
            typed(PricingStructureType::RateBasisCurve).with(REFERENCE_CURVE_UNIQUE_ID, reference)
        };
        r.save_curve("A", &spread(&[(1.0, 0.001)]), basis("B"), None).unwrap();
        r.save_curve("B", &spread(&[(1.0, 0.001)]), basis("C"), None).unwrap();
        r.save_curve("C", &spread(&[(1.0, 0.001)]), basis("A"), None).unwrap();

        let err = r.load("A", false).unwrap_err();
        match err {
            CurveError::CyclicReference { chain } => assert_eq!(chain, vec!["A", "B", "C", "A"]),
            other => panic!("unexpected error {other:?}"),
        }

        r.save_curve("Self", &spread(&[(1.0, 0.001)]), basis("Self"), None).unwrap();
        assert!(matches!(r.load("Self", false), Err(CurveError::CyclicReference { .. })));
    }

    #[test]
    fn test_shared_reference_is_not_a_cycle() {
        let r = resolver();
        r.save_curve("RateCurve.AUD", &zero(&[(1.0, 0.04)]), typed(PricingStructureType::RateCurve), None)
            .unwrap();
        r.save_curve(
            "Xccy",
            &spread(&[(1.0, -0.001)]),
            typed(PricingStructureType::RateXccyCurve)
                .with(REFERENCE_CURVE_UNIQUE_ID, "RateCurve.AUD")
                .with(REFERENCE_FX_CURVE_UNIQUE_ID, "RateCurve.AUD")
                .with(REFERENCE_CURRENCY2_CURVE_ID, "RateCurve.AUD"),
            None,
        )
        .unwrap();

        let curve = r.load("Xccy", false).unwrap();
        assert_eq!(curve.references().len(), 3);
        assert_relative_eq!(curve.value_at_time(1.0), 0.039, epsilon = 1e-12);
    }

    #[test]
    fn test_force_bootstrap_marks_requested_curve_only() {
        let r = resolver();
        r.save_curve("RateCurve.AUD", &zero(&[(1.0, 0.04)]), typed(PricingStructureType::RateCurve), None)
            .unwrap();
        r.save_curve(
            "Basis",
            &spread(&[(1.0, 0.001)]),
            typed(PricingStructureType::RateBasisCurve).with(REFERENCE_CURVE_UNIQUE_ID, "RateCurve.AUD"),
            None,
        )
        .unwrap();

        let curve = r.load("Basis", true).unwrap();
        assert!(curve.needs_bootstrap());
        assert!(!curve.references()[0].needs_bootstrap());

        // The stored properties are untouched.
        assert!(!r.load("Basis", false).unwrap().needs_bootstrap());
    }

    #[test]
    fn test_expired_curve_is_not_found() {
        let r = resolver();
        r.save_curve(
            "Stale",
            &zero(&[(1.0, 0.04)]),
            typed(PricingStructureType::RateCurve),
            Some(Duration::seconds(-1)),
        )
        .unwrap();
        assert!(matches!(r.load("Stale", false), Err(CurveError::CurveNotFound { .. })));
    }

    #[test]
    fn test_find_curves() {
        let r = resolver();
        r.save_curve("RateCurve.NZD", &zero(&[(1.0, 0.04)]), typed(PricingStructureType::RateCurve), None)
            .unwrap();
        r.save_curve("RateCurve.AUD", &zero(&[(1.0, 0.04)]), typed(PricingStructureType::RateCurve), None)
            .unwrap();
        r.save_curve("FxCurve.AUD-USD", &zero(&[(1.0, 0.65)]), typed(PricingStructureType::FxCurve), None)
            .unwrap();

        let rate_curves = r
            .find_curves(&PropertyFilter::all().eq(PRICING_STRUCTURE_TYPE, "RateCurve"))
            .unwrap();
        assert_eq!(rate_curves, vec!["RateCurve.AUD", "RateCurve.NZD"]);
        assert_eq!(r.find_curves(&PropertyFilter::all()).unwrap().len(), 3);
    }
}
