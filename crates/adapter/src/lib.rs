//! Benchmark adapter for LanceDB-style vector stores
//!
//! The adapter owns the lifecycle a benchmark driver walks through:
//! construct (prepare the collection), open a connection scope, load
//! batches, build the index, and run similarity queries. It translates the
//! generic case configuration into store parameters and delegates all
//! storage and search to a [`vdbbench_client::Connector`].
//!
//! # Architecture
//!
//! - [`Adapter`] / [`AdapterBuilder`]: one implementation for the embedded
//!   and managed variants, parameterized by
//!   [`BackendCapabilities`](vdbbench_core::BackendCapabilities)
//! - [`VectorDb`]: the object-safe interface drivers hold
//! - [`Scope`] / [`with_connection`]: scoped connections released on every
//!   exit path
//! - [`SearchFilter`]: scalar restriction for filtered search
//!
//! # Errors
//!
//! Configuration and store errors are returned as [`AdapterError`]. A failed
//! insert is reported in the return value instead, with a count of 0.
//! Calling an operation outside a scope, or passing embeddings and metadata
//! of different lengths, panics.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod builder;
pub mod error;
pub mod filter;
pub mod scope;
pub mod vector_db;

pub use adapter::{Adapter, SCALAR_FIELD, VECTOR_FIELD};
pub use builder::AdapterBuilder;
pub use error::{AdapterError, AdapterResult};
pub use filter::SearchFilter;
pub use scope::{with_connection, Scope};
pub use vector_db::{VectorDb, DEFAULT_K};
