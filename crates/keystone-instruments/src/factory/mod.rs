//! The priceable asset factory.
//!
//! [`PriceableAssetFactory::create`] is the single dispatch point: it looks up
//! the [`Recipe`] for the asset type, checks the property bag and the
//! template against it, resolves any calendars the caller did not supply,
//! normalises the quotes and hands a validated context to the recipe's
//! builder.

mod builders;
mod registry;

pub use registry::{recipe_count, recipe_for, CalendarNeeds, QuotePolicy, Recipe, COMMON_KEYS};

use std::sync::Arc;

use keystone_core::calendars::{BusinessCenters, Calendar, WeekendCalendar};
use keystone_core::types::{Date, Properties};
use keystone_store::Namespace;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use self::builders::BuildContext;
use crate::asset_type::AssetType;
use crate::calendar::CalendarProvider;
use crate::error::{ConstructionError, ConstructionResult};
use crate::identifier::{assign_unique_identifier, build_properties};
use crate::keys;
use crate::priceable::PriceableAsset;
use crate::quotes::{
    find_quotation, inverse_market_quote_add_spread_and_normalise, market_quote_add_spread_and_normalise,
    market_quote_and_normalise, market_quote_price_add_spread_and_normalise, AssetValuation, BasicQuotation,
    MeasureType,
};
use crate::template::{InstrumentNode, InstrumentTemplate, TemplateStore};

/// Message reported by [`PriceableAssetFactory::build_priceable_asset`] on success.
pub const BUILD_SUCCESS_MESSAGE: &str = "Asset built successfully.";

/// Result of [`PriceableAssetFactory::build_priceable_asset`].
#[derive(Debug, Clone)]
pub struct BuiltAsset {
    /// The instrument.
    pub asset: PriceableAsset,
    /// Store id assigned to it.
    pub unique_identifier: String,
    /// Human-readable outcome.
    pub message: String,
}

/// Builds priceable instruments from templates, properties and quotes.
///
/// Holds no mutable state of its own; the template store caches templates and
/// the calendar provider decides whether calendars are memoized.
#[derive(Clone)]
pub struct PriceableAssetFactory {
    templates: Arc<TemplateStore>,
    calendars: Arc<dyn CalendarProvider>,
}

impl PriceableAssetFactory {
    /// Creates a factory.
    pub fn new(templates: Arc<TemplateStore>, calendars: Arc<dyn CalendarProvider>) -> Self {
        Self { templates, calendars }
    }

    /// Same templates, different calendar provider. Batch callers use this to
    /// put a per-batch cache in front of the resolver.
    #[must_use]
    pub fn with_calendar_provider(&self, calendars: Arc<dyn CalendarProvider>) -> Self {
        Self {
            templates: Arc::clone(&self.templates),
            calendars,
        }
    }

    /// The template store.
    #[must_use]
    pub fn templates(&self) -> &Arc<TemplateStore> {
        &self.templates
    }

    /// Builds an instrument.
    ///
    /// `template` is never modified; the per-asset fields go onto a draft
    /// copy. Calendars that are `None` are resolved from the template's
    /// business centers, and only if the recipe uses them.
    ///
    /// # Errors
    ///
    /// - `UnsupportedAssetType` when `AssetType` is absent or unknown
    /// - `MissingRequiredProperty` when a recipe key is absent
    /// - `TemplateShapeMismatch` when the template has the wrong node shape
    /// - anything raised while computing dates or normalising quotes
    pub fn create(
        &self,
        template: &Arc<InstrumentTemplate>,
        valuation: &AssetValuation,
        properties: &Properties,
        fixing_calendar: Option<Arc<dyn Calendar>>,
        payment_calendar: Option<Arc<dyn Calendar>>,
    ) -> ConstructionResult<PriceableAsset> {
        let tag = properties.get_str(keys::ASSET_TYPE).unwrap_or_default();
        let asset_type = AssetType::from_tag(tag).ok_or_else(|| ConstructionError::UnsupportedAssetType {
            asset_type: tag.to_string(),
        })?;
        let recipe = recipe_for(asset_type).ok_or_else(|| ConstructionError::UnsupportedAssetType {
            asset_type: tag.to_string(),
        })?;

        for key in COMMON_KEYS.iter().chain(recipe.required_keys) {
            if !properties.contains_key(key) {
                return Err(ConstructionError::missing_property(*key, asset_type.as_str()));
            }
        }
        let asset_id = properties.get_str(keys::ASSET_ID).unwrap_or_default().to_string();

        if template.shape() != recipe.shape {
            let err = ConstructionError::TemplateShapeMismatch {
                asset_id,
                expected: recipe.shape,
                found: template.shape(),
            };
            warn!(error = %err, "Asset not built");
            return Err(err);
        }

        let base_date = properties
            .get_date(keys::BASE_DATE)
            .ok_or_else(|| ConstructionError::invalid_property(keys::BASE_DATE, "not a date"))?;
        let notional = properties.get_decimal(keys::NOTIONAL);

        let mut draft = template.to_draft();
        draft.set_id(asset_id.clone());

        let fixing = self.calendar(
            fixing_calendar,
            recipe.calendars.fixing,
            template.node().fixing_centers(),
        )?;
        let payment = self.calendar(
            payment_calendar,
            recipe.calendars.payment,
            template.node().payment_centers(),
        )?;

        let inverted = recipe.quote_policy == QuotePolicy::InverseOnTenorMismatch
            && margin_leg_differs_from_index(template.node(), properties);
        let quote = normalise(recipe.quote_policy, inverted, &valuation.quotes)?;

        let ctx = BuildContext {
            recipe,
            asset_type,
            props: properties,
            quotes: &valuation.quotes,
            draft,
            base_date,
            notional,
            inverted,
            fixing,
            payment,
        };
        let mut asset = (recipe.build)(ctx)?;

        if has_market_quote(recipe.quote_policy, &valuation.quotes)? {
            asset.set_market_quote(quote)?;
        }
        asset.attach_valuation(valuation.clone());

        debug!(
            asset_id = %asset.id(),
            asset_type = %asset_type,
            risk_maturity = %asset.risk_maturity_date(),
            "Built priceable asset"
        );
        Ok(asset)
    }

    fn calendar(
        &self,
        supplied: Option<Arc<dyn Calendar>>,
        needed: bool,
        centers: Option<&BusinessCenters>,
    ) -> ConstructionResult<Arc<dyn Calendar>> {
        if let Some(calendar) = supplied {
            return Ok(calendar);
        }
        match centers {
            Some(centers) if needed && !centers.is_empty() => self.calendars.calendar_for(centers),
            _ => Ok(Arc::new(WeekendCalendar)),
        }
    }

    /// Loads the template for the bag's `AssetId` and builds the instrument.
    pub fn create_from_store(
        &self,
        namespace: &Namespace,
        valuation: &AssetValuation,
        properties: &Properties,
        fixing_calendar: Option<Arc<dyn Calendar>>,
        payment_calendar: Option<Arc<dyn Calendar>>,
    ) -> ConstructionResult<PriceableAsset> {
        let template = self.templates.template_for_properties(namespace, properties)?;
        self.create(&template, valuation, properties, fixing_calendar, payment_calendar)
    }

    /// Parses `identifier`, loads its template and builds the instrument.
    pub fn create_from_identifier(
        &self,
        namespace: &Namespace,
        identifier: &str,
        base_date: Date,
        valuation: &AssetValuation,
        fixing_calendar: Option<Arc<dyn Calendar>>,
        payment_calendar: Option<Arc<dyn Calendar>>,
    ) -> ConstructionResult<PriceableAsset> {
        let properties = build_properties(namespace, identifier, base_date, None)?;
        self.create_from_store(namespace, valuation, &properties, fixing_calendar, payment_calendar)
    }

    /// Builds an instrument from parallel quote arrays and a property bag,
    /// assigning a `UniqueIdentifier` when the bag has none.
    pub fn build_priceable_asset(
        &self,
        namespace: &Namespace,
        values: &[Decimal],
        measure_types: &[&str],
        quote_units: &[&str],
        properties: &Properties,
        fixing_calendar: Option<Arc<dyn Calendar>>,
        payment_calendar: Option<Arc<dyn Calendar>>,
    ) -> ConstructionResult<BuiltAsset> {
        let mut properties = properties.clone();
        let asset_id = properties
            .get_str(keys::ASSET_ID)
            .ok_or_else(|| ConstructionError::missing_property(keys::ASSET_ID, "priceable asset"))?
            .to_string();
        let valuation = AssetValuation::from_parallel(asset_id, values, measure_types, quote_units)?;
        let first_value = values.first().copied().unwrap_or_default();
        let unique_identifier = assign_unique_identifier(&mut properties, first_value)?;

        let asset = self.create_from_store(namespace, &valuation, &properties, fixing_calendar, payment_calendar)?;
        info!(unique_identifier = %unique_identifier, "{}", BUILD_SUCCESS_MESSAGE);
        Ok(BuiltAsset {
            asset,
            unique_identifier,
            message: BUILD_SUCCESS_MESSAGE.to_string(),
        })
    }
}

impl std::fmt::Debug for PriceableAssetFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceableAssetFactory")
            .field("templates", &self.templates)
            .finish_non_exhaustive()
    }
}

/// True when the margin leg pays at a different frequency from the index
/// tenor, which means the spread is quoted on the other leg.
fn margin_leg_differs_from_index(node: &InstrumentNode, properties: &Properties) -> bool {
    let InstrumentNode::BasisSwap(basis) = node else {
        return false;
    };
    let index_term = properties
        .get_str(keys::INDEX_TERM)
        .and_then(|t| t.parse().ok())
        .or(basis.index_leg.index_term);
    match index_term {
        Some(index_term) => basis.margin_leg.payment_frequency != index_term,
        None => false,
    }
}

fn normalise(policy: QuotePolicy, inverted: bool, quotes: &[BasicQuotation]) -> ConstructionResult<BasicQuotation> {
    match policy {
        QuotePolicy::Rate => market_quote_add_spread_and_normalise(quotes),
        QuotePolicy::InverseOnTenorMismatch if inverted => inverse_market_quote_add_spread_and_normalise(quotes),
        QuotePolicy::InverseOnTenorMismatch => market_quote_add_spread_and_normalise(quotes),
        QuotePolicy::Price => market_quote_price_add_spread_and_normalise(quotes),
        QuotePolicy::Volatility => {
            if find_quotation(&MeasureType::Volatility, quotes)?.is_some() {
                market_quote_and_normalise(&MeasureType::Volatility, quotes)
            } else {
                market_quote_add_spread_and_normalise(quotes)
            }
        }
    }
}

fn has_market_quote(policy: QuotePolicy, quotes: &[BasicQuotation]) -> ConstructionResult<bool> {
    let market = find_quotation(&MeasureType::MarketQuote, quotes)?.is_some();
    let vol = policy == QuotePolicy::Volatility && find_quotation(&MeasureType::Volatility, quotes)?.is_some();
    Ok(market || vol)
}
