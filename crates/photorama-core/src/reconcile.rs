//! Reconciliation of decoded photos against stored records.
//!
//! Each decoded photo resolves to exactly one record: the one already
//! stored under its photo ID, or a freshly staged one. Stored records are
//! never updated, so the fields of a later duplicate are dropped.

use crate::models::{NewPhoto, PhotoRecord};
use crate::store::{StorageError, StoreTransaction};

/// Outcome of reconciling one batch.
#[derive(Debug, Clone, Default)]
pub struct Reconciled {
    /// One record per decoded photo, in decode order.
    pub records: Vec<PhotoRecord>,
    /// How many of `records` were staged by this pass.
    pub inserted: usize,
    /// How many of `records` resolved to an existing record.
    pub existing: usize,
}

/// Resolve every photo in `photos`, in order, within `tx`.
///
/// Runs sequentially: a duplicate later in the same batch finds the record
/// staged for its first occurrence. Nothing is committed here.
pub async fn reconcile(
    tx: &mut dyn StoreTransaction,
    photos: &[NewPhoto],
) -> Result<Reconciled, StorageError> {
    let mut out = Reconciled {
        records: Vec::with_capacity(photos.len()),
        ..Default::default()
    };

    for photo in photos {
        match tx.find_by_photo_id(&photo.photo_id).await? {
            Some(existing) => {
                out.existing += 1;
                out.records.push(existing);
            }
            None => {
                out.inserted += 1;
                out.records.push(tx.insert(photo).await?);
            }
        }
    }

    tracing::info!(
        inserted = out.inserted,
        existing = out.existing,
        "reconciled photo batch"
    );
    Ok(out)
}
