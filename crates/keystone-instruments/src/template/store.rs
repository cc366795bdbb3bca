//! Template lookup over the object store, with an in-process cache.

use std::collections::HashMap;
use std::sync::Arc;

use keystone_core::types::{Currency, Properties};
use keystone_store::{Namespace, ObjectStore, ObjectStoreExt, StoreKey};
use parking_lot::RwLock;
use tracing::debug;

use super::InstrumentTemplate;
use crate::asset_type::AssetType;
use crate::error::{ConstructionError, ConstructionResult};
use crate::identifier::AssetIdentifier;
use crate::keys;

/// Id prefix of instrument configuration items.
pub const CONFIGURATION_PREFIX: &str = "Configuration.Instrument";

/// Store id of a template: `Configuration.Instrument.{CCY}-{AssetType}[-{ExtraItem}]`.
#[must_use]
pub fn template_id(currency: Currency, asset_type: AssetType, extra_item: Option<&str>) -> String {
    match extra_item {
        Some(extra) => format!("{CONFIGURATION_PREFIX}.{currency}-{asset_type}-{extra}"),
        None => format!("{CONFIGURATION_PREFIX}.{currency}-{asset_type}"),
    }
}

/// Loads templates from an [`ObjectStore`] and shares them as `Arc`s.
///
/// The most specific key (with the `ExtraItem`) is tried first, then the
/// generic key for the currency and asset type. Hits are cached for the
/// lifetime of the `TemplateStore`.
pub struct TemplateStore {
    store: Arc<dyn ObjectStore>,
    cache: RwLock<HashMap<StoreKey, Arc<InstrumentTemplate>>>,
}

impl TemplateStore {
    /// Creates a template store over `store`.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The backing object store.
    #[must_use]
    pub fn object_store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Template for an asset id such as `AUD-IRSwap-3Y-6M`.
    pub fn get_instrument_configuration(
        &self,
        namespace: &Namespace,
        asset_id: &str,
    ) -> ConstructionResult<Arc<InstrumentTemplate>> {
        let parsed = AssetIdentifier::parse(asset_id)?;
        let schema = parsed.schema_properties()?;
        self.lookup(
            namespace,
            asset_id,
            parsed.currency,
            parsed.asset_type,
            schema.get_str(keys::EXTRA_ITEM),
        )
    }

    /// Template for a property bag built by the identifier parser.
    pub fn template_for_properties(
        &self,
        namespace: &Namespace,
        props: &Properties,
    ) -> ConstructionResult<Arc<InstrumentTemplate>> {
        let asset_id = props
            .get_str(keys::ASSET_ID)
            .ok_or_else(|| ConstructionError::missing_property(keys::ASSET_ID, "template lookup"))?;
        let currency_code = props
            .get_str(keys::CURRENCY)
            .ok_or_else(|| ConstructionError::missing_property(keys::CURRENCY, asset_id))?;
        let currency: Currency = currency_code.parse()?;
        let tag = props
            .get_str(keys::ASSET_TYPE)
            .ok_or_else(|| ConstructionError::missing_property(keys::ASSET_TYPE, asset_id))?;
        let asset_type = AssetType::from_tag(tag).ok_or_else(|| ConstructionError::UnsupportedAssetType {
            asset_type: tag.to_string(),
        })?;
        self.lookup(namespace, asset_id, currency, asset_type, props.get_str(keys::EXTRA_ITEM))
    }

    fn lookup(
        &self,
        namespace: &Namespace,
        asset_id: &str,
        currency: Currency,
        asset_type: AssetType,
        extra_item: Option<&str>,
    ) -> ConstructionResult<Arc<InstrumentTemplate>> {
        let mut candidates = Vec::with_capacity(2);
        if let Some(extra) = extra_item {
            candidates.push(namespace.key(template_id(currency, asset_type, Some(extra))));
        }
        candidates.push(namespace.key(template_id(currency, asset_type, None)));

        for key in &candidates {
            if let Some(template) = self.cache.read().get(key) {
                return Ok(Arc::clone(template));
            }
        }

        for key in candidates {
            if let Some((template, _)) = self.store.load_object::<InstrumentTemplate>(&key)? {
                debug!(key = %key, asset_id, "Loaded instrument configuration");
                let template = Arc::new(template);
                self.cache.write().insert(key, Arc::clone(&template));
                return Ok(template);
            }
        }

        Err(ConstructionError::TemplateNotFound {
            namespace: namespace.to_string(),
            asset_id: asset_id.to_string(),
        })
    }

    /// Saves a template and drops any cached copy under the same key.
    pub fn save_template(
        &self,
        namespace: &Namespace,
        asset_type: AssetType,
        extra_item: Option<&str>,
        template: &InstrumentTemplate,
    ) -> ConstructionResult<StoreKey> {
        let key = namespace.key(template_id(template.currency(), asset_type, extra_item));
        let properties = Properties::new()
            .with(keys::ASSET_TYPE, asset_type.as_str())
            .with(keys::CURRENCY, template.currency().code())
            .with(keys::NAMESPACE, namespace.as_str());
        self.store.save_object(key.clone(), template, properties, None)?;
        self.cache.write().remove(&key);
        Ok(key)
    }

    /// Number of cached templates.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.read().len()
    }
}

impl std::fmt::Debug for TemplateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateStore")
            .field("backend", &self.store.backend_name())
            .field("cached", &self.cached())
            .finish()
    }
}
