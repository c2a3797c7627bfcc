//! vdbbench - Pluggable vector-database adapters for benchmark drivers
//!
//! A benchmark driver measures many vector stores through one interface. This
//! crate provides that interface for LanceDB-style stores: connection and
//! case configuration, metric and parameter translation, and an adapter that
//! walks the load / optimize / search lifecycle against a store client.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use vdbbench::{Adapter, DbKind, IndexSearchConfig, MemoryConnector, MetricType, VectorDb};
//!
//! let mut adapter = Adapter::builder(DbKind::LanceDb)
//!     .connector(Arc::new(MemoryConnector::new()))
//!     .dimension(4)
//!     .case_config(IndexSearchConfig::default().with_metric(MetricType::Cosine))
//!     .drop_old(true)
//!     .build()?;
//!
//! let ids = adapter.with_connection(|db| {
//!     db.insert_embeddings(&[vec![0.1, 0.2, 0.3, 0.4]], &[1]);
//!     db.optimize()?;
//!     db.search_embedding(&[0.1, 0.2, 0.3, 0.4], 1, None)
//! })?;
//! ```
//!
//! # Architecture
//!
//! - `vdbbench-core`: configuration, metric translation, parameter bundles
//! - `vdbbench-client`: store client traits and the in-memory reference store
//! - `vdbbench-adapter`: the adapter lifecycle

pub use vdbbench_adapter::{
    with_connection, Adapter, AdapterBuilder, AdapterError, AdapterResult, Scope, SearchFilter,
    VectorDb, DEFAULT_K, SCALAR_FIELD, VECTOR_FIELD,
};
pub use vdbbench_client::{
    ClientError, ClientResult, Column, ConnectParams, Connection, Connector, MemoryConnector,
    MemoryStore, Operation, ResultSet, Table, VectorQuery,
};
pub use vdbbench_core::{
    translate_metric, translate_metric_name, BackendCapabilities, BenchConfig, ConfigError,
    ConfigField, ConfigResult, ConnectionConfig, DbKind, IndexParams, IndexSearchConfig,
    MetricType, SearchParams, SecretString, CONFIG_FILE_NAME, DEFAULT_COLLECTION_NAME,
};
