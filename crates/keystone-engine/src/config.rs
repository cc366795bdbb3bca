//! Engine configuration.

use std::path::{Path, PathBuf};

use chrono::Duration;
use keystone_store::Namespace;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Engine configuration, usually read from TOML.
///
/// ```toml
/// namespace = "Orion"
/// data_group = "Market.EOD"
/// storage_path = "./data/keystone.redb"
/// curve_ttl_seconds = 86400
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Client namespace for templates and assets.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Group under the namespace that holds curves.
    #[serde(default = "default_data_group")]
    pub data_group: String,

    /// redb file; in-memory storage when absent.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,

    /// Lifetime of saved curves. Curves never expire when absent.
    #[serde(default)]
    pub curve_ttl_seconds: Option<i64>,

    /// Namespace holding holiday lists, if not the client namespace.
    #[serde(default)]
    pub holiday_namespace: Option<String>,

    /// Filter used by [`init_tracing`](crate::init_tracing) when `RUST_LOG`
    /// is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_namespace() -> String {
    "Orion".to_string()
}

fn default_data_group() -> String {
    "Market.EOD".to_string()
}

fn default_log_filter() -> String {
    "info,keystone=debug".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            data_group: default_data_group(),
            storage_path: None,
            curve_ttl_seconds: None,
            holiday_namespace: None,
            log_filter: default_log_filter(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| EngineError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values serde cannot.
    pub fn validate(&self) -> EngineResult<()> {
        if self.namespace.trim().is_empty() {
            return Err(EngineError::config("namespace must not be empty"));
        }
        if self.data_group.trim().is_empty() {
            return Err(EngineError::config("data_group must not be empty"));
        }
        if let Some(ttl) = self.curve_ttl_seconds {
            if ttl <= 0 {
                return Err(EngineError::config(format!("curve_ttl_seconds must be positive, got {ttl}")));
            }
        }
        Ok(())
    }

    /// Namespace for templates and assets.
    #[must_use]
    pub fn client_namespace(&self) -> Namespace {
        Namespace::new(self.namespace.as_str())
    }

    /// Namespace for curves: `{namespace}.{data_group}`.
    #[must_use]
    pub fn curve_namespace(&self) -> Namespace {
        Namespace::new(format!("{}.{}", self.namespace, self.data_group))
    }

    /// Namespace for holiday lists.
    #[must_use]
    pub fn holiday_namespace(&self) -> Namespace {
        Namespace::new(self.holiday_namespace.as_deref().unwrap_or(&self.namespace))
    }

    /// Curve time-to-live.
    #[must_use]
    pub fn curve_ttl(&self) -> Option<Duration> {
        self.curve_ttl_seconds.map(Duration::seconds)
    }
}
