use std::{collections::BTreeMap, sync::Mutex};

use async_trait::async_trait;

use crate::types::{Book, NewBook};

use super::{BookStore, StoreError};

/// [`BookStore`] kept in memory, mirroring the behavior of the Postgres store.
///
/// A non-numeric id fails like a failing cast in the database would.
#[derive(Debug, Default)]
pub struct MemoryBookStore {
    inner: Mutex<MemoryBookStoreInner>,
    unavailable: bool,
}

#[derive(Debug, Default)]
struct MemoryBookStoreInner {
    last_id: i64,
    books: BTreeMap<i64, Book>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails as if the database went away.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.lock().books.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryBookStoreInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_available(&self) -> Result<(), StoreError> {
        match self.unavailable {
            true => Err(StoreError::Database(sqlx::Error::PoolClosed)),
            false => Ok(()),
        }
    }

    fn parse_id(id: &str) -> Result<i64, StoreError> {
        id.trim().parse::<i64>().map_err(|err| {
            StoreError::Database(sqlx::Error::Protocol(format!(
                "invalid input syntax for type bigint: \"{id}\": {err}"
            )))
        })
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn create(&self, book: NewBook) -> Result<Book, StoreError> {
        self.check_available()?;

        let mut inner = self.lock();
        inner.last_id += 1;

        let book = Book {
            id: inner.last_id,
            author: book.author,
            title: book.title,
            publisher: Some(book.publisher),
        };
        inner.books.insert(book.id, book.clone());

        Ok(book)
    }

    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        self.check_available()?;

        Ok(self.lock().books.values().cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Book, StoreError> {
        self.check_available()?;
        let id = Self::parse_id(id)?;

        self.lock()
            .books
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: &str) -> Result<u64, StoreError> {
        self.check_available()?;
        let id = Self::parse_id(id)?;

        Ok(self.lock().books.remove(&id).map_or(0, |_| 1))
    }
}
