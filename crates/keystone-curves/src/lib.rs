//! # Keystone Curves
//!
//! Pricing structures and the curve dependency resolver.
//!
//! A curve is stored as a [`CurvePayload`] under its id, with a
//! `PricingStructureType` property saying how to read it. Basis and
//! cross-currency curves are stored as spreads and name the curves they sit
//! on; [`CurveResolver::load`] follows those references depth first and
//! returns the composed [`PricingStructure`].
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use keystone_core::types::{Date, Properties};
//! use keystone_curves::prelude::*;
//! use keystone_store::{InMemoryStore, Namespace};
//!
//! let resolver = CurveResolver::new(Arc::new(InMemoryStore::new()), Namespace::new("Orion"));
//! let base = Date::from_ymd(2025, 1, 15).unwrap();
//!
//! let zero = CurvePayload::new(base, CurveValueKind::ZeroRate, &[(1.0, 0.04), (5.0, 0.045)]);
//! let props = Properties::new().with(PRICING_STRUCTURE_TYPE, "RateCurve");
//! resolver.save_curve("RateCurve.AUD-BBSW-3M", &zero, props, None).unwrap();
//!
//! let spread = CurvePayload::new(base, CurveValueKind::Spread, &[(1.0, 0.001)]);
//! let props = Properties::new()
//!     .with(PRICING_STRUCTURE_TYPE, "RateBasisCurve")
//!     .with(REFERENCE_CURVE_UNIQUE_ID, "RateCurve.AUD-BBSW-3M");
//! resolver.save_curve("RateBasisCurve.AUD-BBSW-6M", &spread, props, None).unwrap();
//!
//! let curve = resolver.load("RateBasisCurve.AUD-BBSW-6M", false).unwrap();
//! assert!((curve.value_at_time(1.0) - 0.041).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod market;
pub mod payload;
pub mod resolver;
pub mod structure;
pub mod structure_type;

pub use error::{CurveError, CurveResult};
pub use market::MarketEnvironment;
pub use payload::{CurvePayload, CurvePillar, CurveValueKind};
pub use resolver::{CurveResolver, ResolveState};
pub use structure::{BasisCurve, PricingStructure, SimpleCurve, XccyCurve};
pub use structure_type::PricingStructureType;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::market::MarketEnvironment;
    pub use crate::payload::{CurvePayload, CurveValueKind};
    pub use crate::resolver::CurveResolver;
    pub use crate::structure::PricingStructure;
    pub use crate::structure_type::{
        PricingStructureType, BOOTSTRAP, MARKET, PRICING_STRUCTURE_TYPE, REFERENCE_CURRENCY2_CURVE_ID,
        REFERENCE_CURVE_UNIQUE_ID, REFERENCE_FX_CURVE_UNIQUE_ID,
    };
}
