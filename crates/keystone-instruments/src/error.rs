//! Error types for instrument construction.

use keystone_core::CoreError;
use keystone_store::StoreError;
use thiserror::Error;

use crate::template::NodeShape;

/// A specialized Result type for instrument construction.
pub type ConstructionResult<T> = Result<T, ConstructionError>;

/// Everything that can stop an instrument from being built.
///
/// Only [`ConstructionError::TemplateShapeMismatch`] is recoverable: it points
/// at stale configuration and the caller may retry with a corrected template.
/// Every other variant is fatal to the construction call that raised it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructionError {
    /// Malformed identifier.
    #[error("Cannot parse identifier '{identifier}': {reason}")]
    Parse {
        /// The identifier as supplied.
        identifier: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The asset-type token of an identifier is not a known tag.
    #[error("Unknown asset type '{tag}' in identifier '{identifier}'")]
    UnknownAssetType {
        /// The offending token.
        tag: String,
        /// The identifier it came from.
        identifier: String,
    },

    /// The factory has no recipe for the requested asset type.
    #[error("Unsupported asset type: {asset_type}")]
    UnsupportedAssetType {
        /// The asset type as requested.
        asset_type: String,
    },

    /// A futures contract code with no dedicated constructor.
    #[error("Unsupported futures contract code '{code}' on exchange '{exchange}'")]
    UnsupportedFuturesCode {
        /// Exchange identifier from the template.
        exchange: String,
        /// Contract code from the identifier.
        code: String,
    },

    /// A property the recipe requires is absent.
    #[error("Missing required property '{key}' for {asset_type}")]
    MissingRequiredProperty {
        /// The missing key.
        key: String,
        /// Asset type being built.
        asset_type: String,
    },

    /// A property is present but holds an unusable value.
    #[error("Invalid property '{key}': {reason}")]
    InvalidProperty {
        /// The offending key.
        key: String,
        /// Why the value is unusable.
        reason: String,
    },

    /// The template's node shape does not match the recipe.
    #[error("Asset not built - template for {asset_id} has shape {found}, expected {expected}")]
    TemplateShapeMismatch {
        /// Asset being built.
        asset_id: String,
        /// Shape the recipe expects.
        expected: NodeShape,
        /// Shape the template has.
        found: NodeShape,
    },

    /// No template is configured for the asset.
    #[error("No instrument configuration for '{asset_id}' in namespace '{namespace}'")]
    TemplateNotFound {
        /// Namespace searched.
        namespace: String,
        /// Asset id looked up.
        asset_id: String,
    },

    /// A required quotation is absent.
    #[error("Measure not found: {measure}")]
    MeasureNotFound {
        /// Measure type that was required.
        measure: String,
    },

    /// More than one quotation carries the same measure type.
    #[error("More than one quote matched the measure type '{measure}'")]
    AmbiguousMeasure {
        /// The duplicated measure type.
        measure: String,
    },

    /// The market quote of an instrument can only be set once.
    #[error("Market quote already set on {asset_id}")]
    QuoteAlreadySet {
        /// Instrument id.
        asset_id: String,
    },

    /// Calendar resolution failed.
    #[error("Calendar error: {0}")]
    Calendar(String),

    /// The backing store failed.
    #[error("Store error: {0}")]
    Store(String),

    /// Date, period or currency error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ConstructionError {
    /// True for failures a caller may recover from by fixing configuration.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ConstructionError::TemplateShapeMismatch { .. })
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    /// Creates a missing property error.
    #[must_use]
    pub fn missing_property(key: impl Into<String>, asset_type: impl Into<String>) -> Self {
        Self::MissingRequiredProperty {
            key: key.into(),
            asset_type: asset_type.into(),
        }
    }

    /// Creates an invalid property error.
    #[must_use]
    pub fn invalid_property(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProperty {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Creates a measure-not-found error.
    #[must_use]
    pub fn measure_not_found(measure: impl Into<String>) -> Self {
        Self::MeasureNotFound {
            measure: measure.into(),
        }
    }
}

impl From<StoreError> for ConstructionError {
    fn from(err: StoreError) -> Self {
        ConstructionError::Store(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_shape_mismatch_is_recoverable() {
        let mismatch = ConstructionError::TemplateShapeMismatch {
            asset_id: "AUD-Deposit-3M".into(),
            expected: NodeShape::Deposit,
            found: NodeShape::Swap,
        };
        assert!(mismatch.is_recoverable());
        assert!(mismatch.to_string().starts_with("Asset not built"));

        let unsupported = ConstructionError::UnsupportedAssetType {
            asset_type: "Unknown".into(),
        };
        assert!(!unsupported.is_recoverable());
        assert!(!ConstructionError::parse("X", "too short").is_recoverable());
    }
}
