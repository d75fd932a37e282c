//! `photorama image`: download the bytes of a stored photo.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::Config;
use crate::photo_store::PhotoStore;

/// Fetch the image for `photo_id` and write it to `out`, or to
/// `<photo_id>.<ext>` in the working directory.
pub async fn run_image(config: &Config, photo_id: &str, out: Option<PathBuf>) -> Result<()> {
    let photos = PhotoStore::from_config(config).await?;

    let record = match photos.find_photo(photo_id).await? {
        Some(r) => r,
        None => {
            eprintln!("Error: photo not found: {}", photo_id);
            std::process::exit(1);
        }
    };

    let image = photos
        .fetch_image(&record)
        .await
        .with_context(|| format!("Failed to download image for photo {}", photo_id))?;

    let path = out.unwrap_or_else(|| PathBuf::from(format!("{}.{}", photo_id, image.extension())));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, &image.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "saved {} ({:?}, {}x{}, {} bytes)",
        path.display(),
        image.format,
        image.width,
        image.height,
        image.bytes.len()
    );

    Ok(())
}
