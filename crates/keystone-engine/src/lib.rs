//! # Keystone Engine
//!
//! Wires a store, the instrument factory and the curve resolver together
//! from one [`EngineConfig`].
//!
//! - [`KeystoneEngine`]: facade over templates, holidays, assets and curves
//! - [`batch`]: builds many assets with calendars memoized per batch
//! - [`init_tracing`]: `tracing-subscriber` setup honouring `RUST_LOG`
//!
//! ## Example
//!
//! ```rust
//! use keystone_engine::{EngineConfig, KeystoneEngine};
//! use keystone_store::ObjectStore;
//!
//! let config = EngineConfig::from_toml("namespace = \"Test\"").unwrap();
//! let engine = KeystoneEngine::open(config).unwrap();
//! assert_eq!(engine.store().backend_name(), "memory");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
mod logging;

pub use batch::{AssetRequest, BatchEntry, BatchReport};
pub use config::EngineConfig;
pub use engine::KeystoneEngine;
pub use error::{EngineError, EngineResult};
pub use logging::init_tracing;
