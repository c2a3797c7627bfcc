//! In-memory databases and connections
//!
//! A [`MemoryStore`] plays the role of the storage service: it outlives the
//! connections made to it, so data written through one connection is seen
//! by the next. Databases are keyed by URI and created on first connect, the
//! way an embedded store creates its directory.

use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

use super::fault::{FaultInjector, Operation};
use super::table::{MemoryTable, MemoryTableHandle};
use crate::error::{ClientError, ClientResult};
use crate::schema::Schema;
use crate::traits::{ConnectParams, Connection, Connector, Table};

/// URI scheme of managed databases
pub const MANAGED_URI_SCHEME: &str = "db://";

/// One database: a set of named tables
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    tables: RwLock<BTreeMap<String, Arc<MemoryTable>>>,
}

impl MemoryDatabase {
    /// Table by name
    pub fn table(&self, name: &str) -> Option<Arc<MemoryTable>> {
        self.tables.read().get(name).cloned()
    }

    /// Table names in sorted order
    pub fn table_names(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }
}

/// Shared state behind every [`MemoryConnector`] cloned from it
#[derive(Debug, Default)]
pub struct MemoryStore {
    databases: DashMap<String, Arc<MemoryDatabase>>,
    faults: FaultInjector,
    open_connections: AtomicUsize,
    open_tables: AtomicUsize,
}

impl MemoryStore {
    /// Database at `uri`, if any connection has created it
    pub fn database(&self, uri: &str) -> Option<Arc<MemoryDatabase>> {
        self.databases.get(uri).map(|db| Arc::clone(db.value()))
    }

    /// Table `name` in the database at `uri`
    pub fn table(&self, uri: &str, name: &str) -> Option<Arc<MemoryTable>> {
        self.database(uri).and_then(|db| db.table(name))
    }

    /// Fault injector consulted by every operation
    pub fn faults(&self) -> &FaultInjector {
        &self.faults
    }

    /// Make the next call of `operation` fail
    pub fn fail_next(&self, operation: Operation, message: impl Into<String>) {
        self.faults.fail_next(operation, message);
    }

    /// Connections currently open
    pub fn open_connections(&self) -> usize {
        self.open_connections.load(Ordering::SeqCst)
    }

    /// Table handles currently open
    pub fn open_tables(&self) -> usize {
        self.open_tables.load(Ordering::SeqCst)
    }

    pub(crate) fn handle_opened(&self) {
        self.open_tables.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn handle_closed(&self) {
        self.open_tables.fetch_sub(1, Ordering::SeqCst);
    }
}

/// [`Connector`] for the in-memory reference store
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    store: Arc<MemoryStore>,
}

impl MemoryConnector {
    /// Connector over a fresh, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Connector over an existing store
    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        MemoryConnector { store }
    }

    /// The underlying store, for inspection and fault injection
    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }
}

impl Connector for MemoryConnector {
    fn connect(&self, params: &ConnectParams) -> ClientResult<Box<dyn Connection>> {
        self.store.faults.check(Operation::Connect)?;

        if params.uri.trim().is_empty() {
            return Err(ClientError::Connection("empty uri".to_string()));
        }
        if params.uri.starts_with(MANAGED_URI_SCHEME) {
            if params.api_key.as_deref().map_or(true, str::is_empty) {
                return Err(ClientError::Connection(
                    "managed database requires an api_key".to_string(),
                ));
            }
            if params.region.as_deref().map_or(true, str::is_empty) {
                return Err(ClientError::Connection(
                    "managed database requires a region".to_string(),
                ));
            }
        }

        let db = Arc::clone(
            self.store
                .databases
                .entry(params.uri.clone())
                .or_default()
                .value(),
        );
        self.store.open_connections.fetch_add(1, Ordering::SeqCst);
        debug!(target: "vdbbench::memory", "Connection opened");

        Ok(Box::new(MemoryConnection {
            store: Arc::clone(&self.store),
            db,
        }))
    }
}

struct MemoryConnection {
    store: Arc<MemoryStore>,
    db: Arc<MemoryDatabase>,
}

impl Drop for MemoryConnection {
    fn drop(&mut self) {
        self.store.open_connections.fetch_sub(1, Ordering::SeqCst);
        debug!(target: "vdbbench::memory", "Connection closed");
    }
}

impl Connection for MemoryConnection {
    fn table_names(&self) -> ClientResult<Vec<String>> {
        self.store.faults.check(Operation::ListTables)?;
        Ok(self.db.table_names())
    }

    fn drop_table(&self, name: &str) -> ClientResult<()> {
        self.store.faults.check(Operation::DropTable)?;
        match self.db.tables.write().remove(name) {
            Some(_) => {
                debug!(target: "vdbbench::memory", table = name, "Dropped table");
                Ok(())
            }
            None => Err(ClientError::TableNotFound {
                name: name.to_string(),
            }),
        }
    }

    fn create_table(&self, name: &str, schema: &Schema) -> ClientResult<()> {
        self.store.faults.check(Operation::CreateTable)?;
        let mut tables = self.db.tables.write();
        if tables.contains_key(name) {
            return Err(ClientError::TableAlreadyExists {
                name: name.to_string(),
            });
        }
        tables.insert(
            name.to_string(),
            Arc::new(MemoryTable::new(name, schema.clone())),
        );
        debug!(target: "vdbbench::memory", table = name, "Created table");
        Ok(())
    }

    fn open_table(&self, name: &str) -> ClientResult<Box<dyn Table>> {
        self.store.faults.check(Operation::OpenTable)?;
        let table = self.db.table(name).ok_or_else(|| ClientError::TableNotFound {
            name: name.to_string(),
        })?;
        Ok(Box::new(MemoryTableHandle::new(
            table,
            Arc::clone(&self.store),
        )))
    }
}
