//! The interface a benchmark driver programs against

use vdbbench_core::DbKind;

use crate::error::{AdapterError, AdapterResult};
use crate::filter::SearchFilter;
use crate::scope;

/// Number of neighbours requested when a driver has no preference
pub const DEFAULT_K: usize = 100;

/// A benchmarkable vector store
///
/// Operations other than `open_scope` and `close_scope` require an open
/// scope; calling them without one is a caller bug and panics. Drivers should
/// prefer `with_connection`, which guarantees the scope is closed.
///
/// Implementations are driven by one caller at a time.
pub trait VectorDb: Send {
    /// Backend kind
    fn kind(&self) -> DbKind;

    /// Open a connection and the collection handle
    fn open_scope(&mut self) -> AdapterResult<()>;

    /// Release the collection handle and the connection
    ///
    /// Idempotent.
    fn close_scope(&mut self);

    /// Whether a scope is open
    fn in_scope(&self) -> bool;

    /// Hook run before a bulk load
    fn ready_to_load(&mut self) -> AdapterResult<()>;

    /// Build the similarity index over loaded data
    ///
    /// May run for a long time and cannot be interrupted here.
    fn optimize(&mut self) -> AdapterResult<()>;

    /// Hook run after loading, before queries
    fn ready_to_search(&mut self) -> AdapterResult<()>;

    /// Insert one batch; returns the inserted count and the failure, if any
    ///
    /// The batch succeeds or fails as a whole: on failure the count is 0.
    ///
    /// # Panics
    ///
    /// If `embeddings` and `metadata` differ in length.
    fn insert_embeddings(
        &mut self,
        embeddings: &[Vec<f32>],
        metadata: &[i32],
    ) -> (usize, Option<AdapterError>);

    /// Ids of the `k` nearest neighbours of `query`, best first
    fn search_embedding(
        &mut self,
        query: &[f32],
        k: usize,
        filters: Option<&SearchFilter>,
    ) -> AdapterResult<Vec<i32>>;
}

impl<'d> dyn VectorDb + 'd {
    /// Run `body` inside a connection scope
    ///
    /// See [`scope::with_connection`].
    pub fn with_connection<T, F>(&mut self, body: F) -> AdapterResult<T>
    where
        F: FnOnce(&mut (dyn VectorDb + 'd)) -> AdapterResult<T>,
    {
        scope::with_connection(self, body)
    }
}
