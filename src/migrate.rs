//! Database schema creation (idempotent).

use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

/// Connect to the configured database and create the schema.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    apply_schema(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Create the `photos` table and its ordering index if missing.
///
/// `seq` records insertion order and breaks ties between photos taken at
/// the same second. `photo_id` is unique so two overlapping ingestion
/// cycles can never both commit the same photo.
pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS photos (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            photo_id TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            remote_url TEXT NOT NULL,
            date_taken INTEGER NOT NULL,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_photos_date_taken ON photos(date_taken, seq)")
        .execute(pool)
        .await?;

    Ok(())
}
