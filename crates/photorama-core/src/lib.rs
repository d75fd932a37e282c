//! # Photorama Core
//!
//! Shared, WASM-safe logic for Photorama: photo models, the Flickr query
//! builder, the response decoder, the store abstraction, and the
//! reconciliation pass that keeps one record per Flickr photo ID.
//!
//! This crate contains no tokio, sqlx, network, or filesystem I/O. The
//! native crate supplies the SQLite store, the HTTP transport, and the
//! orchestrator that ties them together.

pub mod decode;
pub mod flickr;
pub mod models;
pub mod reconcile;
pub mod store;

pub use url::Url;
