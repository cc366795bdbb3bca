//! # Keystone Instruments
//!
//! Identifier-driven construction of priceable financial instruments.
//!
//! This crate provides:
//! - [`identifier`]: parsing of asset codes such as `AUD-IRSwap-3Y-6M` into
//!   typed property bags
//! - [`quotes`]: market quotations and the unit normalizer
//! - [`template`]: immutable instrument templates and their store
//! - [`calendar`]: business calendar resolution from business centers
//! - [`priceable`]: the instruments themselves
//! - [`factory`]: the recipe registry and [`PriceableAssetFactory`]
//!
//! ## Flow
//!
//! ```text
//! identifier ─> build_properties ─> Properties ─┐
//!                                              ├─> PriceableAssetFactory ─> PriceableAsset
//! TemplateStore ─> Arc<InstrumentTemplate> ────┤
//! quotes ─> normaliser ────────────────────────┤
//! BusinessCenters ─> CalendarProvider ─────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use keystone_instruments::prelude::*;
//! use keystone_core::types::Date;
//! use keystone_store::Namespace;
//!
//! let base = Date::from_ymd(2025, 1, 15).unwrap();
//! let props = build_properties(&Namespace::new("Orion"), "AUD-Caplet-3M-6M-0.05", base, None).unwrap();
//! assert_eq!(props.get_str("StartTerm"), Some("3M"));
//! assert_eq!(props.get_str("ExtraItem"), Some("6M"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod asset_type;
pub mod calendar;
pub mod error;
pub mod factory;
pub mod identifier;
pub mod keys;
pub mod priceable;
pub mod quotes;
pub mod template;

pub use error::{ConstructionError, ConstructionResult};
pub use factory::{BuiltAsset, PriceableAssetFactory};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::asset_type::{AssetFamily, AssetType, OptionType};
    pub use crate::calendar::{CalendarCache, CalendarProvider, CalendarResolver, HolidaySource, StoreHolidaySource};
    pub use crate::error::{ConstructionError, ConstructionResult};
    pub use crate::factory::{BuiltAsset, PriceableAssetFactory, QuotePolicy, Recipe};
    pub use crate::identifier::{build_properties, build_properties_for_bond, canonical_identifier, AssetIdentifier};
    pub use crate::priceable::{Priceable, PriceableAsset};
    pub use crate::quotes::{AssetValuation, BasicQuotation, MeasureType, QuoteUnits};
    pub use crate::template::{InstrumentNode, InstrumentTemplate, NodeShape, TemplateDraft, TemplateStore};
}
