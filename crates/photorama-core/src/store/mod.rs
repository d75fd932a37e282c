//! Storage abstraction for Photorama.
//!
//! The [`Store`] trait is the persistence boundary for photo records. All
//! writes go through a [`StoreTransaction`]: lookups and inserts are staged
//! in the transaction and become visible to other readers only after
//! [`commit`](StoreTransaction::commit). Dropping a transaction without
//! committing discards everything it staged.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewPhoto, PhotoRecord};

/// Failure reported by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend rejected the operation (I/O, SQL, pool, ...).
    #[error("storage backend error: {0}")]
    Backend(String),
    /// A record with this photo ID was committed by someone else first.
    #[error("photo {0} already stored")]
    Conflict(String),
}

/// A unit of work against a [`Store`].
///
/// Obtained from [`Store::begin`]. Lookups see both committed records and
/// records staged earlier in the same transaction.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Look up a record by its Flickr photo ID.
    async fn find_by_photo_id(&mut self, photo_id: &str)
        -> Result<Option<PhotoRecord>, StorageError>;

    /// Stage a new record. Does not commit.
    ///
    /// Callers check [`find_by_photo_id`](Self::find_by_photo_id) first;
    /// staging a second record for the same ID is a conflict.
    async fn insert(&mut self, photo: &NewPhoto) -> Result<PhotoRecord, StorageError>;

    /// Durably persist everything staged. On failure nothing is persisted.
    async fn commit(self: Box<Self>) -> Result<(), StorageError>;
}

/// Abstract storage backend for photo records.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`begin`](Store::begin) | Open a transaction for one ingestion cycle |
/// | [`find_by_photo_id`](Store::find_by_photo_id) | Committed point lookup |
/// | [`fetch_all_ordered`](Store::fetch_all_ordered) | Every record, oldest capture first |
/// | [`count`](Store::count) | Number of committed records |
#[async_trait]
pub trait Store: Send + Sync {
    /// Open a new transaction.
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StorageError>;

    /// Look up a committed record by its Flickr photo ID.
    async fn find_by_photo_id(&self, photo_id: &str) -> Result<Option<PhotoRecord>, StorageError>;

    /// Every committed record, sorted by `date_taken` ascending with ties
    /// kept in insertion order.
    async fn fetch_all_ordered(&self) -> Result<Vec<PhotoRecord>, StorageError>;

    /// Number of committed records.
    async fn count(&self) -> Result<u64, StorageError>;
}
