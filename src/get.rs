//! `photorama get`: show one stored photo.

use anyhow::Result;

use photorama_core::store::Store;

use crate::config::Config;
use crate::sqlite_store::SqliteStore;

/// CLI entry point: looks the photo up and prints it to stdout.
pub async fn run_get(config: &Config, photo_id: &str) -> Result<()> {
    let store = SqliteStore::open(config).await?;

    let photo = match store.find_by_photo_id(photo_id).await? {
        Some(p) => p,
        None => {
            eprintln!("Error: photo not found: {}", photo_id);
            std::process::exit(1);
        }
    };

    println!("--- Photo ---");
    println!("photo_id:    {}", photo.photo_id);
    println!(
        "title:       {}",
        if photo.title.is_empty() {
            "(untitled)"
        } else {
            photo.title.as_str()
        }
    );
    println!(
        "date_taken:  {}",
        photo.date_taken.format("%Y-%m-%d %H:%M:%S")
    );
    println!("remote_url:  {}", photo.remote_url);
    println!("seq:         {}", photo.seq);

    Ok(())
}
