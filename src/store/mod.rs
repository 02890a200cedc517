//! Book persistence.
//!
//! Handlers only see [`BookStore`]; production wires in [`PgBookStore`].

#[cfg(test)]
pub mod memory;
mod postgres;

use async_trait::async_trait;

use crate::types::{Book, NewBook};

pub use postgres::PgBookStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Book not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One method per persistence call. Ids are passed through as received, the
/// store is responsible for interpreting them.
#[async_trait]
pub trait BookStore: Send + Sync + 'static {
    /// Inserts the book and returns it with its assigned id.
    async fn create(&self, book: NewBook) -> Result<Book, StoreError>;

    /// Returns every live book ordered by id.
    async fn list(&self) -> Result<Vec<Book>, StoreError>;

    /// Returns the live book with the given id or [`StoreError::NotFound`].
    async fn get(&self, id: &str) -> Result<Book, StoreError>;

    /// Deletes the book with the given id, returning the number of affected books.
    ///
    /// Deleting a missing book is not an error.
    async fn delete(&self, id: &str) -> Result<u64, StoreError>;
}
