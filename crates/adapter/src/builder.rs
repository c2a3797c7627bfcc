//! Adapter builder
//!
//! Construction talks to the store: it connects, drops the collection when
//! asked to, and creates it when absent. Everything else the adapter needs is
//! supplied here first.
//!
//! ```ignore
//! let adapter = Adapter::builder(DbKind::LanceDb)
//!     .connector(Arc::new(MemoryConnector::new()))
//!     .dimension(768)
//!     .case_config(IndexSearchConfig::default().with_metric(MetricType::Cosine))
//!     .drop_old(true)
//!     .build()?;
//! ```

use std::sync::Arc;

use tracing::{info_span, Span};
use vdbbench_client::Connector;
use vdbbench_core::{
    validate_collection_name, BenchConfig, ConnectionConfig, DbKind, IndexSearchConfig,
    DEFAULT_COLLECTION_NAME,
};

use crate::adapter::Adapter;
use crate::error::{AdapterError, AdapterResult};

// ============================================================================
// Adapter Builder Pattern
// ============================================================================

/// Builder for [`Adapter`]
///
/// `connector` and `dimension` are required. An absent connection config
/// takes the kind's defaults, which the managed kind rejects for lack of
/// credentials. An absent case config takes the kind's defaults.
pub struct AdapterBuilder {
    kind: DbKind,
    connector: Option<Arc<dyn Connector>>,
    dimension: Option<usize>,
    connection_config: Option<ConnectionConfig>,
    case_config: Option<IndexSearchConfig>,
    collection_name: String,
    drop_old: bool,
    span: Option<Span>,
}

impl AdapterBuilder {
    /// Create new builder with defaults
    pub fn new(kind: DbKind) -> Self {
        Self {
            kind,
            connector: None,
            dimension: None,
            connection_config: None,
            case_config: None,
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            drop_old: false,
            span: None,
        }
    }

    /// Builder preloaded from a run config
    pub fn from_config(config: &BenchConfig) -> Self {
        Self::new(config.db)
            .connection_config(config.connection.clone())
            .case_config(config.case.clone())
            .collection_name(config.collection_name.clone())
            .drop_old(config.drop_old)
    }

    /// Store client used for every connection
    pub fn connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Vector width of the collection
    pub fn dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }

    /// Connection settings
    pub fn connection_config(mut self, config: ConnectionConfig) -> Self {
        self.connection_config = Some(config);
        self
    }

    /// Index/search knobs
    pub fn case_config(mut self, config: IndexSearchConfig) -> Self {
        self.case_config = Some(config);
        self
    }

    /// Target collection (default `VectorDBBenchCollection`)
    pub fn collection_name(mut self, name: impl Into<String>) -> Self {
        self.collection_name = name.into();
        self
    }

    /// Drop an existing collection before creating it
    pub fn drop_old(mut self, drop_old: bool) -> Self {
        self.drop_old = drop_old;
        self
    }

    /// Span to record the adapter's events under
    ///
    /// Defaults to an `adapter` span carrying the backend and collection.
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Validate the settings and prepare the collection
    ///
    /// Store errors propagate; nothing is retried.
    pub fn build(self) -> AdapterResult<Adapter> {
        let connector = self.connector.ok_or(AdapterError::MissingPart("connector"))?;
        let dimension = self.dimension.ok_or(AdapterError::MissingPart("dimension"))?;
        if dimension == 0 {
            return Err(AdapterError::InvalidDimension { dimension });
        }
        validate_collection_name(&self.collection_name)?;

        let kind = self.kind;
        let connection_config = match self.connection_config {
            Some(config) => {
                config.validate_for(kind)?;
                config
            }
            None => ConnectionConfig::for_backend(kind, None, None, None)?,
        };
        let case_config = self
            .case_config
            .unwrap_or_else(|| IndexSearchConfig::for_backend(kind))
            .shaped_for(kind);
        let span = self.span.unwrap_or_else(|| {
            info_span!(
                target: "vdbbench::adapter",
                "adapter",
                db = kind.name(),
                collection = %self.collection_name
            )
        });

        let adapter = Adapter {
            kind,
            caps: kind.capabilities(),
            connector,
            connection_config,
            case_config,
            collection_name: self.collection_name,
            dimension,
            span,
            connection: None,
            table: None,
        };

        let _span = adapter.span.clone().entered();
        adapter.prepare_collection(self.drop_old)?;
        Ok(adapter)
    }
}
