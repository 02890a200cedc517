use async_trait::async_trait;
use sqlx::PgPool;

use crate::types::{Book, NewBook};

use super::{BookStore, StoreError};

/// [`BookStore`] backed by the `books` table.
///
/// Deletes are soft: they stamp `deleted_at`, and every read skips stamped rows.
/// Tables created by other tools may hold NULL `author`/`title`, read back as `""`.
#[derive(Debug, Clone)]
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    #[tracing::instrument(name = "pg_create_book", skip_all)]
    async fn create(&self, book: NewBook) -> Result<Book, StoreError> {
        let book: Book = sqlx::query_as(
            r#"
            INSERT INTO books (created_at, updated_at, author, title, publisher)
            VALUES (NOW(), NOW(), $1, $2, $3)
            RETURNING id, COALESCE(author, '') AS author, COALESCE(title, '') AS title, publisher
            "#,
        )
        .bind(book.author)
        .bind(book.title)
        .bind(book.publisher)
        .fetch_one(&self.pool)
        .await?;

        Ok(book)
    }

    #[tracing::instrument(name = "pg_list_books", skip_all)]
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let books: Vec<Book> = sqlx::query_as(
            r#"
            SELECT id, COALESCE(author, '') AS author, COALESCE(title, '') AS title, publisher
            FROM books
            WHERE deleted_at IS NULL
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        tracing::trace!(count = books.len(), "Fetched");

        Ok(books)
    }

    #[tracing::instrument(name = "pg_get_book", skip(self))]
    async fn get(&self, id: &str) -> Result<Book, StoreError> {
        let book: Option<Book> = sqlx::query_as(
            r#"
            SELECT id, COALESCE(author, '') AS author, COALESCE(title, '') AS title, publisher
            FROM books
            WHERE id = $1::bigint AND deleted_at IS NULL
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        book.ok_or(StoreError::NotFound)
    }

    #[tracing::instrument(name = "pg_delete_book", skip(self))]
    async fn delete(&self, id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET deleted_at = NOW()
            WHERE id = $1::bigint AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> PgBookStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("pool creation failed");

        crate::db::migrate(&pool).await.expect("migration failed");

        PgBookStore::new(pool)
    }

    fn new_book(title: &str) -> NewBook {
        NewBook {
            author: "Ursula K. Le Guin".to_string(),
            title: title.to_string(),
            publisher: "Ace".to_string(),
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn created_book_can_be_fetched_and_soft_deleted() {
        let store = store().await;

        let created = store
            .create(new_book("The Left Hand of Darkness"))
            .await
            .expect("insert failed");
        assert!(created.id > 0);

        let id = created.id.to_string();
        let fetched = store.get(&id).await.expect("get failed");
        assert_eq!(fetched, created);

        assert_eq!(store.delete(&id).await.expect("delete failed"), 1);
        assert!(matches!(store.get(&id).await, Err(StoreError::NotFound)));
        assert_eq!(store.delete(&id).await.expect("delete failed"), 0);

        let listed = store.list().await.expect("list failed");
        assert!(listed.iter().all(|book| book.id != created.id));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn non_numeric_id_fails_in_the_query() {
        let store = store().await;

        assert!(matches!(
            store.get("not-a-number").await,
            Err(StoreError::Database(_))
        ));
        assert!(matches!(
            store.delete("not-a-number").await,
            Err(StoreError::Database(_))
        ));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn null_author_and_title_read_as_empty() {
        let store = store().await;

        // Columns created outside our migration carry no NOT NULL constraint.
        sqlx::query("ALTER TABLE books ALTER COLUMN author DROP NOT NULL, ALTER COLUMN title DROP NOT NULL")
            .execute(&store.pool)
            .await
            .expect("alter failed");

        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO books (created_at, updated_at, author, title) VALUES (NOW(), NOW(), NULL, NULL) RETURNING id",
        )
        .fetch_one(&store.pool)
        .await
        .expect("insert failed");

        let fetched = store.get(&id.to_string()).await.expect("get failed");
        assert_eq!(fetched.author, "");
        assert_eq!(fetched.title, "");
        assert_eq!(fetched.publisher, None);

        let listed = store.list().await.expect("list failed");
        assert!(listed.iter().any(|book| book.id == id && book.title.is_empty()));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_creates_get_distinct_ids() {
        let store = store().await;

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.create(new_book(&format!("Volume {i}"))).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            let book = handle.await.expect("task panicked").expect("insert failed");
            ids.push(book.id);
        }

        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }
}
