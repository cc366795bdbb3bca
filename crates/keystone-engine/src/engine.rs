//! The engine facade.

use std::sync::Arc;

use keystone_core::traits::MarketData;
use keystone_core::types::{Date, Properties};
use keystone_curves::structure_type::MARKET;
use keystone_curves::{CurvePayload, CurveResolver, MarketEnvironment, PricingStructure};
use keystone_instruments::asset_type::AssetType;
use keystone_instruments::calendar::{CalendarProvider, CalendarResolver, StoreHolidaySource};
use keystone_instruments::priceable::PriceableAsset;
use keystone_instruments::quotes::AssetValuation;
use keystone_instruments::template::{InstrumentTemplate, TemplateStore};
use keystone_instruments::PriceableAssetFactory;
use keystone_store::{InMemoryStore, ObjectStore, PropertyFilter, RedbStore, StoreKey};
use tracing::info;

use crate::batch::{self, AssetRequest, BatchReport};
use crate::config::EngineConfig;
use crate::error::EngineResult;

/// Store, factory and curve resolver wired from one [`EngineConfig`].
pub struct KeystoneEngine {
    config: EngineConfig,
    store: Arc<dyn ObjectStore>,
    holidays: StoreHolidaySource,
    calendars: Arc<CalendarResolver>,
    factory: PriceableAssetFactory,
    curves: CurveResolver,
}

impl KeystoneEngine {
    /// Opens the configured backend: redb when `storage_path` is set,
    /// in-memory otherwise.
    pub fn open(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let store: Arc<dyn ObjectStore> = match &config.storage_path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(keystone_store::StoreError::from)?;
                }
                Arc::new(RedbStore::open(path)?)
            }
            None => Arc::new(InMemoryStore::new()),
        };
        Ok(Self::with_store(config, store))
    }

    /// Builds the engine over an existing store.
    pub fn with_store(config: EngineConfig, store: Arc<dyn ObjectStore>) -> Self {
        let holidays = StoreHolidaySource::new(Arc::clone(&store));
        let calendars = Arc::new(CalendarResolver::new(
            Arc::new(StoreHolidaySource::new(Arc::clone(&store))),
            config.holiday_namespace(),
        ));
        let templates = Arc::new(TemplateStore::new(Arc::clone(&store)));
        let factory = PriceableAssetFactory::new(templates, Arc::clone(&calendars) as Arc<dyn CalendarProvider>);
        let curves = CurveResolver::new(Arc::clone(&store), config.curve_namespace());

        info!(
            backend = store.backend_name(),
            namespace = %config.namespace,
            curves = %config.curve_namespace(),
            "Keystone engine ready"
        );
        Self {
            config,
            store,
            holidays,
            calendars,
            factory,
            curves,
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Instrument factory, resolving calendars without memoization.
    #[must_use]
    pub fn factory(&self) -> &PriceableAssetFactory {
        &self.factory
    }

    /// Calendar resolver shared by the factory and batches.
    #[must_use]
    pub fn calendars(&self) -> &Arc<CalendarResolver> {
        &self.calendars
    }

    /// Curve resolver over the curve namespace.
    #[must_use]
    pub fn curves(&self) -> &CurveResolver {
        &self.curves
    }

    /// Saves the holiday list of a business center.
    pub fn save_holidays(&self, center: &str, holidays: &[Date]) -> EngineResult<()> {
        self.holidays
            .save_holidays(&self.config.holiday_namespace(), center, holidays)?;
        Ok(())
    }

    /// Saves an instrument template in the client namespace.
    pub fn save_template(
        &self,
        asset_type: AssetType,
        extra_item: Option<&str>,
        template: &InstrumentTemplate,
    ) -> EngineResult<StoreKey> {
        let namespace = self.config.client_namespace();
        Ok(self
            .factory
            .templates()
            .save_template(&namespace, asset_type, extra_item, template)?)
    }

    /// Builds a single asset from its identifier.
    pub fn build_asset(
        &self,
        identifier: &str,
        base_date: Date,
        valuation: &AssetValuation,
    ) -> EngineResult<PriceableAsset> {
        let namespace = self.config.client_namespace();
        Ok(self
            .factory
            .create_from_identifier(&namespace, identifier, base_date, valuation, None, None)?)
    }

    /// Builds many assets, sharing calendars across the batch. Failures are
    /// reported per entry.
    #[must_use]
    pub fn build_batch(&self, requests: &[AssetRequest]) -> BatchReport {
        batch::build_batch(
            &self.factory,
            Arc::clone(&self.calendars) as Arc<dyn CalendarProvider>,
            &self.config.client_namespace(),
            requests,
        )
    }

    /// Saves a curve with the configured time-to-live.
    pub fn save_curve(&self, curve_id: &str, payload: &CurvePayload, properties: Properties) -> EngineResult<StoreKey> {
        Ok(self
            .curves
            .save_curve(curve_id, payload, properties, self.config.curve_ttl())?)
    }

    /// Loads one curve and its references.
    pub fn load_curve(&self, curve_id: &str, force_bootstrap: bool) -> EngineResult<Arc<PricingStructure>> {
        Ok(self.curves.load(curve_id, force_bootstrap)?)
    }

    /// Loads every curve tagged with `Market = market`.
    pub fn load_market(&self, market: &str, force_bootstrap: bool) -> EngineResult<MarketEnvironment> {
        let ids = self.curves.find_curves(&PropertyFilter::all().eq(MARKET, market))?;
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        Ok(self.curves.load_market(market, &ids, force_bootstrap)?)
    }

    /// Values `asset` against the curve `curve_id`.
    pub fn evaluate(&self, asset: &PriceableAsset, curve_id: &str) -> EngineResult<AssetValuation> {
        let curve = self.curves.load(curve_id, false)?;
        Ok(asset.calculate(curve.as_ref() as &dyn MarketData))
    }

    /// Removes expired items from the store.
    pub fn purge_expired(&self) -> EngineResult<usize> {
        let removed = self.store.purge_expired()?;
        info!(removed, "Purged expired items");
        Ok(removed)
    }
}

impl std::fmt::Debug for KeystoneEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeystoneEngine")
            .field("config", &self.config)
            .field("backend", &self.store.backend_name())
            .finish_non_exhaustive()
    }
}
