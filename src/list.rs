//! `photorama list`: every stored photo, oldest capture first.

use anyhow::Result;

use photorama_core::store::Store;

use crate::config::Config;
use crate::sqlite_store::SqliteStore;

pub async fn run_list(config: &Config, json: bool) -> Result<()> {
    let store = SqliteStore::open(config).await?;
    let all = store.fetch_all_ordered().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }

    if all.is_empty() {
        println!("no photos stored");
        return Ok(());
    }

    println!("{:<19}  {:<14}  TITLE", "TAKEN", "PHOTO ID");
    for photo in &all {
        println!(
            "{:<19}  {:<14}  {}",
            photo.date_taken.format("%Y-%m-%d %H:%M:%S"),
            photo.photo_id,
            if photo.title.is_empty() {
                "(untitled)"
            } else {
                photo.title.as_str()
            }
        );
    }
    println!();
    println!("{} photos", all.len());

    Ok(())
}
