//! SQLite-backed [`Store`] implementation.
//!
//! One [`SqliteTransaction`] wraps one `sqlx` transaction, so every lookup
//! and insert of an ingestion cycle runs on the same connection and is
//! committed (or rolled back on drop) as a unit.
//!
//! Transactions start with `BEGIN IMMEDIATE`: the write lock is taken
//! before the first lookup, so a cycle never reads a snapshot that another
//! process's commit has already made stale.

use async_trait::async_trait;
use chrono::DateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

use photorama_core::models::{NewPhoto, PhotoRecord};
use photorama_core::store::{StorageError, Store, StoreTransaction};
use photorama_core::Url;

use crate::config::Config;
use crate::{db, migrate};

const SELECT_COLUMNS: &str = "SELECT seq, photo_id, title, remote_url, date_taken FROM photos";

/// SQLite implementation of the [`Store`] trait over the `photos` table.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to the configured database, creating the schema if missing.
    pub async fn open(config: &Config) -> anyhow::Result<Self> {
        let pool = db::connect(config).await?;
        migrate::apply_schema(&pool).await?;
        Ok(Self::new(pool))
    }
}

fn backend(err: sqlx::Error) -> StorageError {
    StorageError::Backend(err.to_string())
}

fn record_from_row(row: &SqliteRow) -> Result<PhotoRecord, StorageError> {
    let remote_url: String = row.try_get("remote_url").map_err(backend)?;
    let date_taken: i64 = row.try_get("date_taken").map_err(backend)?;
    Ok(PhotoRecord {
        seq: row.try_get("seq").map_err(backend)?,
        photo_id: row.try_get("photo_id").map_err(backend)?,
        title: row.try_get("title").map_err(backend)?,
        remote_url: Url::parse(&remote_url).map_err(|e| {
            StorageError::Backend(format!("stored remote_url '{}' is invalid: {}", remote_url, e))
        })?,
        date_taken: DateTime::from_timestamp(date_taken, 0)
            .ok_or_else(|| {
                StorageError::Backend(format!("stored date_taken {} out of range", date_taken))
            })?
            .naive_utc(),
    })
}

/// A write transaction for one ingestion cycle.
pub struct SqliteTransaction {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl StoreTransaction for SqliteTransaction {
    async fn find_by_photo_id(
        &mut self,
        photo_id: &str,
    ) -> Result<Option<PhotoRecord>, StorageError> {
        let row = sqlx::query(&format!("{} WHERE photo_id = ?", SELECT_COLUMNS))
            .bind(photo_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(backend)?;
        row.as_ref().map(record_from_row).transpose()
    }

    async fn insert(&mut self, photo: &NewPhoto) -> Result<PhotoRecord, StorageError> {
        let now = chrono::Utc::now().timestamp();
        let result = sqlx::query(
            "INSERT INTO photos (photo_id, title, remote_url, date_taken, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&photo.photo_id)
        .bind(&photo.title)
        .bind(photo.remote_url.as_str())
        .bind(photo.date_taken.and_utc().timestamp())
        .bind(now)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StorageError::Conflict(photo.photo_id.clone())
            }
            other => backend(other),
        })?;

        Ok(PhotoRecord::from_new(result.last_insert_rowid(), photo))
    }

    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        self.tx.commit().await.map_err(backend)
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StorageError> {
        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(backend)?;
        Ok(Box::new(SqliteTransaction { tx }))
    }

    async fn find_by_photo_id(&self, photo_id: &str) -> Result<Option<PhotoRecord>, StorageError> {
        let row = sqlx::query(&format!("{} WHERE photo_id = ?", SELECT_COLUMNS))
            .bind(photo_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.as_ref().map(record_from_row).transpose()
    }

    async fn fetch_all_ordered(&self) -> Result<Vec<PhotoRecord>, StorageError> {
        let rows = sqlx::query(&format!("{} ORDER BY date_taken ASC, seq ASC", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        rows.iter().map(record_from_row).collect()
    }

    async fn count(&self) -> Result<u64, StorageError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM photos")
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;
        Ok(n as u64)
    }
}
