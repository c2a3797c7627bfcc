//! In-memory reference collaborator
//!
//! Implements the collaborator traits without a network service so adapters
//! can be exercised end to end:
//!
//! - **MemoryConnector / MemoryStore**: databases keyed by URI, shared by
//!   every connection
//! - **MemoryTable**: fixed-schema tables with atomic batch appends, recorded
//!   index builds, exact search and a query log
//! - **FaultInjector**: arm one-shot failures per operation

pub mod distance;
pub mod fault;
pub mod store;
pub mod table;

pub use fault::{FaultInjector, Operation};
pub use store::{MemoryConnector, MemoryDatabase, MemoryStore, MANAGED_URI_SCHEME};
pub use table::{IndexInfo, MemoryTable};
