use sqlx::PgPool;

/// Columns added to an existing `books` table that lacks them.
const BOOK_COLUMNS: &[(&str, &str)] = &[
    ("created_at", "TIMESTAMPTZ"),
    ("updated_at", "TIMESTAMPTZ"),
    ("deleted_at", "TIMESTAMPTZ"),
    ("author", "TEXT NOT NULL DEFAULT ''"),
    ("title", "TEXT NOT NULL DEFAULT ''"),
    ("publisher", "TEXT"),
];

/// Reconciles the book schema: creates the table when absent and adds any
/// missing column to an older one.
#[tracing::instrument(name = "migrate", skip_all)]
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running book migrations");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id BIGSERIAL PRIMARY KEY,
            created_at TIMESTAMPTZ,
            updated_at TIMESTAMPTZ,
            deleted_at TIMESTAMPTZ,
            author TEXT NOT NULL DEFAULT '',
            title TEXT NOT NULL DEFAULT '',
            publisher TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    for (column, definition) in BOOK_COLUMNS {
        sqlx::query(&format!(
            "ALTER TABLE books ADD COLUMN IF NOT EXISTS {column} {definition}"
        ))
        .execute(pool)
        .await?;
    }

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_books_deleted_at ON books (deleted_at)")
        .execute(pool)
        .await?;

    tracing::info!("Book migrations complete");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires database"]
    async fn migrate_is_idempotent() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("pool creation failed");

        migrate(&pool).await.expect("first migration failed");
        migrate(&pool).await.expect("second migration failed");

        let columns: Vec<(String,)> = sqlx::query_as(
            "SELECT column_name::text FROM information_schema.columns WHERE table_name = 'books'",
        )
        .fetch_all(&pool)
        .await
        .expect("query failed");

        for (column, _) in BOOK_COLUMNS {
            assert!(
                columns.iter().any(|(name,)| name == column),
                "column {column} is missing"
            );
        }
    }
}
