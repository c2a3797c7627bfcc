//! Collaborator interface
//!
//! The adapter drives a vector store exclusively through these traits.
//! A production binding wraps a real client; [`MemoryConnector`] is the
//! in-process reference implementation.
//!
//! Every method is a potentially blocking remote call. Implementations
//! handle their own transport retries; callers above this layer never retry.
//!
//! [`MemoryConnector`]: crate::memory::MemoryConnector

use std::collections::BTreeMap;
use std::fmt;

use vdbbench_core::IndexParams;

use crate::error::{ClientError, ClientResult};
use crate::query::{ResultSet, VectorQuery};
use crate::schema::{Record, Schema};

/// Arguments of a connect call
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectParams {
    /// Endpoint URI
    pub uri: String,
    /// API key for managed stores
    pub api_key: Option<String>,
    /// Region for managed stores
    pub region: Option<String>,
}

impl ConnectParams {
    /// Params for a store that needs only a URI
    pub fn new(uri: impl Into<String>) -> Self {
        ConnectParams {
            uri: uri.into(),
            api_key: None,
            region: None,
        }
    }

    /// Build from the key-value map a connection config exposes
    ///
    /// `uri` is required; `api_key` and `region` are optional. Other keys are
    /// ignored.
    pub fn from_options(options: &BTreeMap<String, String>) -> ClientResult<Self> {
        let uri = options
            .get("uri")
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ClientError::Connection("connect options lack 'uri'".to_string()))?;
        Ok(ConnectParams {
            uri: uri.clone(),
            api_key: options.get("api_key").cloned(),
            region: options.get("region").cloned(),
        })
    }
}

impl fmt::Debug for ConnectParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectParams")
            .field("uri", &"**********")
            .field("api_key", &self.api_key.as_ref().map(|_| "**********"))
            .field("region", &self.region)
            .finish()
    }
}

/// Entry point of a vector-store client
pub trait Connector: Send + Sync {
    /// Open a connection
    fn connect(&self, params: &ConnectParams) -> ClientResult<Box<dyn Connection>>;
}

/// A live connection to one database
///
/// Dropping the connection releases it.
pub trait Connection: Send {
    /// Names of all tables
    fn table_names(&self) -> ClientResult<Vec<String>>;

    /// Drop a table and its data
    ///
    /// Errors if the table does not exist.
    fn drop_table(&self, name: &str) -> ClientResult<()>;

    /// Create an empty table
    ///
    /// Errors if the table already exists.
    fn create_table(&self, name: &str, schema: &Schema) -> ClientResult<()>;

    /// Open a handle on an existing table
    fn open_table(&self, name: &str) -> ClientResult<Box<dyn Table>>;
}

/// An open table handle
///
/// Dropping the handle releases it.
pub trait Table: Send {
    /// Table name
    fn name(&self) -> &str;

    /// Append a batch of records
    ///
    /// The batch is applied atomically: on error no record is visible.
    fn add(&self, records: Vec<Record>) -> ClientResult<()>;

    /// Build a similarity index over a vector column
    ///
    /// May take a long time. Parameter validation happens here.
    fn create_index(&self, column: &str, params: &IndexParams) -> ClientResult<()>;

    /// Run a nearest-neighbour query
    ///
    /// Rows come back best match first.
    fn search(&self, query: &VectorQuery) -> ClientResult<ResultSet>;

    /// Number of rows
    fn count_rows(&self) -> ClientResult<usize>;
}
