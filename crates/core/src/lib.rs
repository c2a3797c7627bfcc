//! Core types for vdbbench adapters
//!
//! This crate holds everything an adapter needs before it talks to a store:
//! - MetricType and the metric translator
//! - ConnectionConfig / IndexSearchConfig and the `vdbbench.toml` loader
//! - IndexParams / SearchParams rendered from a case config
//! - DbKind and BackendCapabilities describing backend variants
//! - ConfigError

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod collection;
pub mod config;
pub mod error;
pub mod metric;
pub mod params;
pub mod secret;

pub use backend::{BackendCapabilities, ConfigField, DbKind};
pub use collection::{validate_collection_name, MAX_COLLECTION_NAME_LEN};
pub use config::{
    BenchConfig, ConnectionConfig, IndexSearchConfig, CONFIG_FILE_NAME, DEFAULT_COLLECTION_NAME,
};
pub use error::{ConfigError, ConfigResult};
pub use metric::{
    translate_metric, translate_metric_name, MetricType, METRIC_COSINE, METRIC_DOT, METRIC_L2,
};
pub use params::{IndexParams, SearchParams};
pub use secret::SecretString;
