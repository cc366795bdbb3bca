//! Engine error types.

use keystone_curves::CurveError;
use keystone_instruments::ConstructionError;
use keystone_store::StoreError;
use thiserror::Error;

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine error type.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration could not be read or is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Instrument construction failed.
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    /// Curve resolution failed.
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// Storage backend failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
