//! Image byte validation.
//!
//! Downloaded bytes are only handed back to callers once they decode as an
//! image. The bytes themselves are returned untouched.

use bytes::Bytes;
use image::ImageFormat;
use thiserror::Error;

use crate::error::FetchError;

/// Bytes arrived but are not an image this build can decode.
#[derive(Debug, Error)]
#[error("could not create image from {len} downloaded bytes: {source}")]
pub struct ImageDecodeError {
    pub len: usize,
    #[source]
    pub source: image::ImageError,
}

/// A downloaded photo that is known to decode.
#[derive(Debug, Clone)]
pub struct PhotoImage {
    pub bytes: Bytes,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl PhotoImage {
    /// Decode `bytes` to confirm they form an image and record its shape.
    pub fn from_bytes(bytes: Bytes) -> Result<Self, ImageDecodeError> {
        let err = |source| ImageDecodeError {
            len: bytes.len(),
            source,
        };
        let format = image::guess_format(&bytes).map_err(err)?;
        let decoded = image::load_from_memory_with_format(&bytes, format).map_err(err)?;
        Ok(Self {
            width: decoded.width(),
            height: decoded.height(),
            format,
            bytes,
        })
    }

    /// [`from_bytes`](Self::from_bytes) on the blocking pool.
    ///
    /// Decoding a full-size photo is CPU-bound and must not hold an async
    /// worker. A panic inside the decoder is resumed on the caller.
    pub async fn decode(bytes: Bytes) -> Result<Self, FetchError> {
        match tokio::task::spawn_blocking(move || Self::from_bytes(bytes)).await {
            Ok(result) => Ok(result?),
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => Err(FetchError::Cancelled),
        }
    }

    /// Lowercase file extension for the detected format.
    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("img")
    }
}
