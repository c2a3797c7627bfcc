//! Vector-store collaborator interface for vdbbench
//!
//! Adapters never talk to a store directly. They go through the traits in
//! [`traits`]: a [`Connector`] opens [`Connection`]s, a connection opens
//! [`Table`] handles, and tables take batches, build indexes and answer
//! [`VectorQuery`]s with columnar [`ResultSet`]s.
//!
//! [`memory`] provides a complete in-process implementation used by tests,
//! benches and dry runs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod memory;
pub mod predicate;
pub mod query;
pub mod schema;
pub mod traits;

pub use error::{ClientError, ClientResult};
pub use memory::{MemoryConnector, MemoryStore, Operation};
pub use predicate::{CmpOp, Predicate};
pub use query::{Column, ResultSet, VectorQuery, DEFAULT_QUERY_LIMIT, DISTANCE_COLUMN};
pub use schema::{DataType, Field, Record, Schema, Value};
pub use traits::{ConnectParams, Connection, Connector, Table};
