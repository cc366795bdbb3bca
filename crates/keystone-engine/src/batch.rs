//! Batch instrument construction.
//!
//! A batch shares one [`CalendarCache`] across its entries, so each distinct
//! business-center set is read from the store once per batch. Entries that
//! fail are logged and reported with a message; the rest of the batch still
//! builds.

use std::sync::Arc;

use keystone_core::types::Date;
use keystone_instruments::calendar::{CalendarCache, CalendarProvider};
use keystone_instruments::priceable::PriceableAsset;
use keystone_instruments::quotes::{AssetValuation, BasicQuotation};
use keystone_instruments::PriceableAssetFactory;
use keystone_store::Namespace;
use tracing::{info, warn};

/// One instrument to build.
#[derive(Debug, Clone)]
pub struct AssetRequest {
    /// Asset identifier, e.g. `AUD-IRSwap-3Y`.
    pub identifier: String,
    /// Valuation date.
    pub base_date: Date,
    /// Quotes for the asset.
    pub valuation: AssetValuation,
}

impl AssetRequest {
    /// Creates a request whose valuation is named after the identifier.
    pub fn new(identifier: impl Into<String>, base_date: Date, quotes: Vec<BasicQuotation>) -> Self {
        let identifier = identifier.into();
        let valuation = AssetValuation::new(identifier.clone(), quotes);
        Self {
            identifier,
            base_date,
            valuation,
        }
    }
}

/// Outcome of one request.
#[derive(Debug, Clone)]
pub struct BatchEntry {
    /// Identifier as requested.
    pub identifier: String,
    /// The instrument, when it was built.
    pub asset: Option<PriceableAsset>,
    /// Success message or the reason for failure.
    pub message: String,
    /// True when the failure can be fixed by correcting configuration.
    pub recoverable: bool,
}

impl BatchEntry {
    /// True when the asset was built.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.asset.is_some()
    }
}

/// Result of a batch, in request order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// One entry per request.
    pub entries: Vec<BatchEntry>,
    /// Distinct calendars resolved for the batch.
    pub calendars_resolved: usize,
}

impl BatchReport {
    /// Number of assets built.
    #[must_use]
    pub fn built(&self) -> usize {
        self.entries.iter().filter(|e| e.is_built()).count()
    }

    /// Entries that failed.
    pub fn failures(&self) -> impl Iterator<Item = &BatchEntry> {
        self.entries.iter().filter(|e| !e.is_built())
    }

    /// Built assets, in request order.
    pub fn assets(&self) -> impl Iterator<Item = &PriceableAsset> {
        self.entries.iter().filter_map(|e| e.asset.as_ref())
    }
}

/// Builds every request with `factory`, memoizing calendars for the batch.
pub fn build_batch(
    factory: &PriceableAssetFactory,
    calendars: Arc<dyn CalendarProvider>,
    namespace: &Namespace,
    requests: &[AssetRequest],
) -> BatchReport {
    let cache = Arc::new(CalendarCache::new(calendars));
    let factory = factory.with_calendar_provider(Arc::clone(&cache) as Arc<dyn CalendarProvider>);

    let entries: Vec<BatchEntry> = requests
        .iter()
        .map(|request| {
            match factory.create_from_identifier(
                namespace,
                &request.identifier,
                request.base_date,
                &request.valuation,
                None,
                None,
            ) {
                Ok(asset) => BatchEntry {
                    identifier: request.identifier.clone(),
                    message: format!("Built {} maturing {}", asset.id(), asset.risk_maturity_date()),
                    asset: Some(asset),
                    recoverable: false,
                },
                Err(err) => {
                    warn!(
                        identifier = %request.identifier,
                        recoverable = err.is_recoverable(),
                        error = %err,
                        "Batch entry failed"
                    );
                    BatchEntry {
                        identifier: request.identifier.clone(),
                        asset: None,
                        message: err.to_string(),
                        recoverable: err.is_recoverable(),
                    }
                }
            }
        })
        .collect();

    let report = BatchReport {
        entries,
        calendars_resolved: cache.len(),
    };
    info!(
        namespace = %namespace,
        requested = requests.len(),
        built = report.built(),
        calendars = report.calendars_resolved,
        "Batch complete"
    );
    report
}
