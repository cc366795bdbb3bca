//! Error types for curve loading and composition.

use keystone_store::StoreError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
///
/// Every variant is fatal to the load that raised it: a derived curve is
/// unusable without all of its references.
#[derive(Error, Debug)]
pub enum CurveError {
    /// No live item under the requested id.
    #[error("Curve not found: {namespace}.{curve_id}")]
    CurveNotFound {
        /// Namespace searched.
        namespace: String,
        /// Curve id.
        curve_id: String,
    },

    /// A derived curve does not name one of the curves it is built on.
    #[error("Curve {curve_id} has no {property}")]
    MissingReferenceCurve {
        /// The derived curve.
        curve_id: String,
        /// The property that should hold the reference id.
        property: String,
    },

    /// A curve depends on itself through its references.
    #[error("Cyclic curve reference: {}", chain.join(" -> "))]
    CyclicReference {
        /// Ids from the outermost load down to the repeated id.
        chain: Vec<String>,
    },

    /// `PricingStructureType` is absent or not recognised.
    #[error("Curve {curve_id} has unknown pricing structure type '{value}'")]
    UnknownStructureType {
        /// Curve id.
        curve_id: String,
        /// The stored value, empty when absent.
        value: String,
    },

    /// The stored payload is not a valid curve.
    #[error("Cannot deserialize curve {curve_id}: {reason}")]
    Deserialization {
        /// Curve id.
        curve_id: String,
        /// Description of the failure.
        reason: String,
    },

    /// Store failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl CurveError {
    /// Creates a deserialization error.
    #[must_use]
    pub fn deserialization(curve_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Deserialization {
            curve_id: curve_id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a missing-reference error.
    #[must_use]
    pub fn missing_reference(curve_id: impl Into<String>, property: impl Into<String>) -> Self {
        Self::MissingReferenceCurve {
            curve_id: curve_id.into(),
            property: property.into(),
        }
    }
}
