//! # Photorama
//!
//! **Fetch interesting photos from Flickr, keep one local record per photo,
//! and download image bytes on demand.**
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌────────────┐   ┌──────────┐
//! │ FlickrApi  │──▶│  Transport   │──▶│  Decoder   │──▶│ Reconcile│
//! │ (URL)      │   │  (reqwest)   │   │ (JSON)     │   │ + commit │
//! └────────────┘   └──────────────┘   └────────────┘   └────┬─────┘
//!                                                           ▼
//!                                                      ┌──────────┐
//!                                                      │  SQLite  │
//!                                                      └──────────┘
//! ```
//!
//! ## Data Flow
//!
//! 1. [`photo_store::PhotoStore`] asks the query builder
//!    ([`photorama_core::flickr`]) for the interesting-photos URL.
//! 2. The [`transport`] fetches it; the body goes through the decoder
//!    ([`photorama_core::decode`]), which skips unusable elements.
//! 3. Every decoded photo is reconciled against the store inside one
//!    transaction: an existing record wins, otherwise a new one is staged.
//! 4. The transaction commits as a whole or not at all.
//! 5. Image bytes are fetched separately from a record's `remote_url` and
//!    validated by [`image`].
//!
//! Results come back either from `async fn`s or, for the `*_with`
//! variants, through a completion closure run on the [`consumer`] queue.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`db`] | SQLite connection pool with WAL mode |
//! | [`migrate`] | Schema creation (idempotent) |
//! | [`sqlite_store`] | SQLite [`Store`](photorama_core::store::Store) |
//! | [`transport`] | Outbound GET seam and `reqwest` implementation |
//! | [`image`] | Image byte validation |
//! | [`error`] | `FetchError` taxonomy |
//! | [`consumer`] | Serial completion queue |
//! | [`photo_store`] | Ingestion orchestrator |
//! | [`ingest`], [`list`], [`get`], [`image_cmd`], [`stats`] | CLI commands |

pub mod config;
pub mod consumer;
pub mod db;
pub mod error;
pub mod get;
pub mod image;
pub mod image_cmd;
pub mod ingest;
pub mod list;
pub mod migrate;
pub mod photo_store;
pub mod sqlite_store;
pub mod stats;
pub mod transport;

pub use error::FetchError;
pub use photo_store::PhotoStore;
pub use photorama_core::{decode, flickr, models, reconcile, store};
