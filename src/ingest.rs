//! `photorama fetch`: one ingestion cycle.

use anyhow::Result;

use crate::config::Config;
use crate::photo_store::PhotoStore;

/// Fetch interesting photos, store the new ones, and print a summary.
pub async fn run_fetch(config: &Config) -> Result<()> {
    let photos = PhotoStore::from_config(config).await?;

    let reconciled = photos.ingest_interesting_photos().await?;
    let total = photos.store().count().await?;

    println!("fetch interesting photos");
    println!("  fetched: {} photos", reconciled.records.len());
    println!("  new: {}", reconciled.inserted);
    println!("  existing: {}", reconciled.existing);
    println!("  stored total: {}", total);
    println!("ok");

    Ok(())
}
