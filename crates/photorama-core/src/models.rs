//! Core data models shared by the decoder, the stores, and the orchestrator.

use chrono::NaiveDateTime;
use serde::Serialize;
use url::Url;

/// Fields decoded from one element of a Flickr photo list.
///
/// Produced by [`decode_photos`](crate::decode::decode_photos) and turned
/// into a [`PhotoRecord`] by a store transaction on first sight of its
/// `photo_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhoto {
    /// Flickr's photo ID. Never empty.
    pub photo_id: String,
    pub title: String,
    /// Where the high-resolution image bytes live (`url_h`).
    pub remote_url: Url,
    /// Capture time as reported by Flickr (`datetaken`, no zone).
    pub date_taken: NaiveDateTime,
}

/// A photo persisted in a [`Store`](crate::store::Store).
///
/// Records are created once per `photo_id` and never updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoRecord {
    /// Store-assigned insertion sequence. Breaks ties between equal
    /// `date_taken` values when listing.
    pub seq: i64,
    pub photo_id: String,
    pub title: String,
    pub remote_url: Url,
    pub date_taken: NaiveDateTime,
}

impl PhotoRecord {
    /// Build a record from decoded fields and a store-assigned sequence.
    pub fn from_new(seq: i64, photo: &NewPhoto) -> Self {
        Self {
            seq,
            photo_id: photo.photo_id.clone(),
            title: photo.title.clone(),
            remote_url: photo.remote_url.clone(),
            date_taken: photo.date_taken,
        }
    }
}
