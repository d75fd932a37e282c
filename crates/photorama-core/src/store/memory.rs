//! In-memory [`Store`] implementation for testing and WASM targets.
//!
//! Committed records live in a `Vec` (commit order) behind a
//! `std::sync::RwLock`. Transactions buffer their inserts locally and
//! append them in one step on commit.

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::models::{NewPhoto, PhotoRecord};

use super::{StorageError, Store, StoreTransaction};

#[derive(Default)]
struct Shared {
    records: RwLock<Vec<PhotoRecord>>,
    next_seq: AtomicI64,
}

impl Shared {
    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<PhotoRecord>>, StorageError> {
        self.records
            .read()
            .map_err(|_| StorageError::Backend("in-memory store lock poisoned".into()))
    }

    fn find(&self, photo_id: &str) -> Result<Option<PhotoRecord>, StorageError> {
        Ok(self.read()?.iter().find(|r| r.photo_id == photo_id).cloned())
    }
}

/// In-memory store for testing and WASM environments.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    shared: Arc<Shared>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

struct InMemoryTransaction {
    shared: Arc<Shared>,
    staged: Vec<PhotoRecord>,
}

#[async_trait]
impl StoreTransaction for InMemoryTransaction {
    async fn find_by_photo_id(
        &mut self,
        photo_id: &str,
    ) -> Result<Option<PhotoRecord>, StorageError> {
        if let Some(staged) = self.staged.iter().find(|r| r.photo_id == photo_id) {
            return Ok(Some(staged.clone()));
        }
        self.shared.find(photo_id)
    }

    async fn insert(&mut self, photo: &NewPhoto) -> Result<PhotoRecord, StorageError> {
        if self.staged.iter().any(|r| r.photo_id == photo.photo_id) {
            return Err(StorageError::Conflict(photo.photo_id.clone()));
        }
        let seq = self.shared.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let record = PhotoRecord::from_new(seq, photo);
        self.staged.push(record.clone());
        Ok(record)
    }

    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        let InMemoryTransaction { shared, staged } = *self;
        let mut records = shared
            .records
            .write()
            .map_err(|_| StorageError::Backend("in-memory store lock poisoned".into()))?;

        // Same guarantee as a UNIQUE index: a racing commit for the same ID
        // fails as a whole.
        let duplicate = {
            let committed: HashSet<&str> = records.iter().map(|r| r.photo_id.as_str()).collect();
            staged
                .iter()
                .find(|r| committed.contains(r.photo_id.as_str()))
                .map(|r| r.photo_id.clone())
        };
        if let Some(photo_id) = duplicate {
            return Err(StorageError::Conflict(photo_id));
        }

        records.extend(staged);
        Ok(())
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StorageError> {
        Ok(Box::new(InMemoryTransaction {
            shared: Arc::clone(&self.shared),
            staged: Vec::new(),
        }))
    }

    async fn find_by_photo_id(&self, photo_id: &str) -> Result<Option<PhotoRecord>, StorageError> {
        self.shared.find(photo_id)
    }

    async fn fetch_all_ordered(&self) -> Result<Vec<PhotoRecord>, StorageError> {
        let mut all = self.shared.read()?.clone();
        all.sort_by_key(|r| (r.date_taken, r.seq));
        Ok(all)
    }

    async fn count(&self) -> Result<u64, StorageError> {
        Ok(self.shared.read()?.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use url::Url;

    fn photo(id: &str, day: u32) -> NewPhoto {
        NewPhoto {
            photo_id: id.to_string(),
            title: format!("title {id}"),
            remote_url: Url::parse(&format!("http://x/{id}.jpg")).unwrap(),
            date_taken: NaiveDate::from_ymd_opt(2021, 3, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn staged_records_invisible_until_commit() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.insert(&photo("a", 1)).await.unwrap();

        assert!(tx.find_by_photo_id("a").await.unwrap().is_some());
        assert!(store.find_by_photo_id("a").await.unwrap().is_none());

        tx.commit().await.unwrap();
        assert!(store.find_by_photo_id("a").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn dropped_transaction_discards_inserts() {
        let store = InMemoryStore::new();
        {
            let mut tx = store.begin().await.unwrap();
            tx.insert(&photo("a", 1)).await.unwrap();
        }
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn racing_commits_conflict() {
        let store = InMemoryStore::new();
        let mut first = store.begin().await.unwrap();
        let mut second = store.begin().await.unwrap();
        first.insert(&photo("a", 1)).await.unwrap();
        second.insert(&photo("a", 2)).await.unwrap();

        first.commit().await.unwrap();
        assert!(matches!(
            second.commit().await,
            Err(StorageError::Conflict(id)) if id == "a"
        ));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn ordered_by_date_then_insertion() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.insert(&photo("late", 9)).await.unwrap();
        tx.insert(&photo("tie-1", 4)).await.unwrap();
        tx.insert(&photo("early", 1)).await.unwrap();
        tx.insert(&photo("tie-2", 4)).await.unwrap();
        tx.commit().await.unwrap();

        let ids: Vec<String> = store
            .fetch_all_ordered()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.photo_id)
            .collect();
        assert_eq!(ids, vec!["early", "tie-1", "tie-2", "late"]);
    }
}
