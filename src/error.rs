//! Errors delivered through the orchestrator's result channel.

use photorama_core::decode::DecodeError;
use photorama_core::store::StorageError;
use thiserror::Error;

use crate::image::ImageDecodeError;
use crate::transport::TransportError;

/// Every recoverable failure of a fetch. Nothing here is retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    ImageDecode(#[from] ImageDecodeError),
    /// The runtime shut down while the image was still decoding.
    #[error("image decoding was cancelled")]
    Cancelled,
}

pub type PhotosResult = Result<Vec<photorama_core::models::PhotoRecord>, FetchError>;
pub type ImageResult = Result<crate::image::PhotoImage, FetchError>;
