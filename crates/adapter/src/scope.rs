//! Connection scopes
//!
//! A [`Scope`] owns an open connection scope on a [`VectorDb`] and closes it
//! when dropped, so the collection handle and connection are released on
//! every exit path, including early returns and unwinding panics.

use std::ops::{Deref, DerefMut};

use crate::error::AdapterResult;
use crate::vector_db::VectorDb;

/// RAII guard over an open connection scope
pub struct Scope<'a, D: VectorDb + ?Sized> {
    db: &'a mut D,
}

impl<'a, D: VectorDb + ?Sized> Scope<'a, D> {
    /// Open a scope on `db`
    ///
    /// Nothing is held if opening fails.
    pub fn open(db: &'a mut D) -> AdapterResult<Self> {
        db.open_scope()?;
        Ok(Scope { db })
    }
}

impl<D: VectorDb + ?Sized> Deref for Scope<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        self.db
    }
}

impl<D: VectorDb + ?Sized> DerefMut for Scope<'_, D> {
    fn deref_mut(&mut self) -> &mut D {
        self.db
    }
}

impl<D: VectorDb + ?Sized> Drop for Scope<'_, D> {
    fn drop(&mut self) {
        self.db.close_scope();
    }
}

/// Open a scope on `db`, run `body`, and close the scope
///
/// Errors opening the scope are returned without running `body`. Whatever
/// `body` returns is passed through after the scope is closed.
///
/// # Example
///
/// ```ignore
/// let ids = with_connection(&mut adapter, |db| {
///     db.insert_embeddings(&vectors, &ids).1.map_or(Ok(()), Err)?;
///     db.optimize()?;
///     db.search_embedding(&query, 10, None)
/// })?;
/// ```
pub fn with_connection<D, T, F>(db: &mut D, body: F) -> AdapterResult<T>
where
    D: VectorDb + ?Sized,
    F: FnOnce(&mut D) -> AdapterResult<T>,
{
    let mut scope = Scope::open(db)?;
    body(&mut *scope)
}
