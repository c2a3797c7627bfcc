//! The LanceDB-family adapter
//!
//! One [`Adapter`] serves both the embedded and the managed variant. Where
//! they differ, the adapter consults the kind's [`BackendCapabilities`]
//! rather than branching on the kind itself.
//!
//! # Lifecycle
//!
//! ```text
//! builder().build()      connect, drop/create the collection, disconnect
//!   with_connection(..)  open connection + table handle
//!     ready_to_load()
//!     insert_embeddings() ...
//!     optimize()
//!     ready_to_search()
//!     search_embedding() ...
//!   (scope closed)       handle and connection released
//! ```
//!
//! # Filtered search
//!
//! A filtered search is not parameter-equivalent to an unfiltered one: it
//! sends the predicate and the index metric but no probe count and no refine
//! factor. Tests pin this behavior.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, Span};
use vdbbench_client::{
    ConnectParams, Connection, Connector, Field, Record, Schema, Table, Value, VectorQuery,
};
use vdbbench_core::{BackendCapabilities, ConfigField, ConnectionConfig, DbKind, IndexSearchConfig};

use crate::builder::AdapterBuilder;
use crate::error::{AdapterError, AdapterResult};
use crate::filter::SearchFilter;
use crate::scope;
use crate::vector_db::VectorDb;

/// Scalar id column
pub const SCALAR_FIELD: &str = "id";

/// Vector column
pub const VECTOR_FIELD: &str = "vector";

const LOG_TARGET: &str = "vdbbench::adapter";

/// Benchmark adapter over a LanceDB-style store
pub struct Adapter {
    pub(crate) kind: DbKind,
    pub(crate) caps: BackendCapabilities,
    pub(crate) connector: Arc<dyn Connector>,
    pub(crate) connection_config: ConnectionConfig,
    pub(crate) case_config: IndexSearchConfig,
    pub(crate) collection_name: String,
    pub(crate) dimension: usize,
    pub(crate) span: Span,
    pub(crate) connection: Option<Box<dyn Connection>>,
    pub(crate) table: Option<Box<dyn Table>>,
}

impl Adapter {
    /// Start building an adapter for `kind`
    pub fn builder(kind: DbKind) -> AdapterBuilder {
        AdapterBuilder::new(kind)
    }

    /// Connection config fields accepted by `kind`
    pub fn config_fields(kind: DbKind) -> &'static [ConfigField] {
        kind.config_fields()
    }

    /// Index/search config fields accepted by `kind`
    pub fn case_config_fields(kind: DbKind) -> &'static [ConfigField] {
        kind.case_config_fields()
    }

    /// Capabilities of this adapter's backend
    pub fn capabilities(&self) -> BackendCapabilities {
        self.caps
    }

    /// Target collection
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// Vector width of the collection
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Connection settings
    pub fn connection_config(&self) -> &ConnectionConfig {
        &self.connection_config
    }

    /// Index/search knobs
    pub fn case_config(&self) -> &IndexSearchConfig {
        &self.case_config
    }

    /// Span all of this adapter's events are recorded under
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Run `body` inside a connection scope
    ///
    /// The table handle and connection are released when `body` returns,
    /// fails, or panics.
    pub fn with_connection<T, F>(&mut self, body: F) -> AdapterResult<T>
    where
        F: FnOnce(&mut Adapter) -> AdapterResult<T>,
    {
        scope::with_connection(self, body)
    }

    /// Open a connection to the store
    pub(crate) fn connect(&self) -> AdapterResult<Box<dyn Connection>> {
        let params = ConnectParams::from_options(&self.connection_config.to_map())?;
        Ok(self.connector.connect(&params)?)
    }

    /// Drop the collection if asked to, then create it if absent
    pub(crate) fn prepare_collection(&self, drop_old: bool) -> AdapterResult<()> {
        let conn = self.connect()?;
        let mut exists = conn
            .table_names()?
            .iter()
            .any(|name| *name == self.collection_name);

        if drop_old && exists {
            conn.drop_table(&self.collection_name)?;
            info!(target: LOG_TARGET, "Dropped existing collection");
            exists = false;
        }

        if !exists {
            let schema = Schema::new(vec![
                Field::int32(SCALAR_FIELD),
                Field::vector(VECTOR_FIELD, self.dimension),
            ])?;
            conn.create_table(&self.collection_name, &schema)?;
            info!(target: LOG_TARGET, dimension = self.dimension, "Created collection");
        }
        Ok(())
    }

    fn scoped_table(&self, operation: &str) -> &dyn Table {
        match self.table.as_deref() {
            Some(table) => table,
            None => panic!("{operation} called outside a connection scope"),
        }
    }

    fn build_query(&self, query: &[f32], k: usize, filters: Option<&SearchFilter>) -> VectorQuery {
        let base = VectorQuery::new(query.to_vec());
        match filters.and_then(|f| f.expression(SCALAR_FIELD)) {
            Some(expr) => base
                .metric(self.case_config.index_params().metric)
                .limit(k)
                .select([SCALAR_FIELD])
                .only_if(expr),
            None => {
                let params = self.case_config.search_params();
                let mut query = base.metric(params.metric).nprobes(params.nprobes);
                if self.caps.supports_refine_factor {
                    if let Some(refine_factor) = params.refine_factor {
                        query = query.refine_factor(refine_factor);
                    }
                }
                query.limit(k).select([SCALAR_FIELD])
            }
        }
    }
}

impl VectorDb for Adapter {
    fn kind(&self) -> DbKind {
        self.kind
    }

    fn open_scope(&mut self) -> AdapterResult<()> {
        assert!(
            self.table.is_none() && self.connection.is_none(),
            "connection scope is already open"
        );
        let _span = self.span.clone().entered();

        let conn = self.connect()?;
        let table = conn.open_table(&self.collection_name)?;
        self.connection = Some(conn);
        self.table = Some(table);
        debug!(target: LOG_TARGET, "Opened connection scope");
        Ok(())
    }

    fn close_scope(&mut self) {
        let released = self.table.take().is_some();
        self.connection = None;
        if released {
            let _span = self.span.clone().entered();
            debug!(target: LOG_TARGET, "Closed connection scope");
        }
    }

    fn in_scope(&self) -> bool {
        self.table.is_some()
    }

    fn ready_to_load(&mut self) -> AdapterResult<()> {
        // Neither LanceDB variant indexes on its own during a load
        if self.caps.auto_index_on_connect {
            let _span = self.span.clone().entered();
            debug!(target: LOG_TARGET, "Store indexes on write; nothing to suspend");
        }
        Ok(())
    }

    fn optimize(&mut self) -> AdapterResult<()> {
        let _span = self.span.clone().entered();
        let table = self.scoped_table("optimize");

        if !self.caps.builds_index_on_optimize {
            info!(target: LOG_TARGET, "Index is managed by the service, skipping build");
            return Ok(());
        }

        let params = self.case_config.index_params();
        info!(
            target: LOG_TARGET,
            metric = params.metric,
            num_partitions = params.num_partitions,
            num_sub_vectors = params.num_sub_vectors,
            "Building index"
        );
        table.create_index(VECTOR_FIELD, &params)?;
        debug!(target: LOG_TARGET, "Index built");
        Ok(())
    }

    fn ready_to_search(&mut self) -> AdapterResult<()> {
        Ok(())
    }

    fn insert_embeddings(
        &mut self,
        embeddings: &[Vec<f32>],
        metadata: &[i32],
    ) -> (usize, Option<AdapterError>) {
        let table = self.scoped_table("insert_embeddings");
        assert_eq!(
            embeddings.len(),
            metadata.len(),
            "embeddings and metadata must have the same length"
        );
        let _span = self.span.clone().entered();

        let records = embeddings
            .iter()
            .zip(metadata)
            .map(|(embedding, id)| {
                Record::new()
                    .with(VECTOR_FIELD, Value::Vector(embedding.clone()))
                    .with(SCALAR_FIELD, Value::Int32(*id))
            })
            .collect();

        match table.add(records) {
            Ok(()) => {
                debug!(target: LOG_TARGET, count = embeddings.len(), "Inserted batch");
                (embeddings.len(), None)
            }
            Err(e) => {
                info!(target: LOG_TARGET, error = %e, "Failed to insert data");
                (0, Some(e.into()))
            }
        }
    }

    fn search_embedding(
        &mut self,
        query: &[f32],
        k: usize,
        filters: Option<&SearchFilter>,
    ) -> AdapterResult<Vec<i32>> {
        let table = self.scoped_table("search_embedding");
        let request = self.build_query(query, k, filters);
        let results = table.search(&request)?;

        let column = results
            .column(SCALAR_FIELD)
            .ok_or_else(|| AdapterError::MissingColumn {
                column: SCALAR_FIELD.to_string(),
            })?;
        let ids = column.as_int32().ok_or_else(|| AdapterError::UnexpectedColumn {
            column: SCALAR_FIELD.to_string(),
            expected: "int32",
        })?;
        Ok(ids.to_vec())
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("kind", &self.kind)
            .field("collection_name", &self.collection_name)
            .field("dimension", &self.dimension)
            .field("connection_config", &self.connection_config)
            .field("case_config", &self.case_config)
            .field("in_scope", &self.in_scope())
            .finish()
    }
}
