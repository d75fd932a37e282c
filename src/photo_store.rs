//! Photo ingestion orchestrator.
//!
//! [`PhotoStore`] owns the query builder, the transport, and the record
//! store, and runs the two independent flows:
//!
//! ```text
//! fetch_interesting_photos:
//!   build URL → GET → decode → (one transaction) reconcile → commit
//!
//! fetch_image:
//!   GET record.remote_url → decode on the blocking pool to validate
//! ```
//!
//! Each flow is an `async fn` with a single `Result`. The `*_with` variants
//! run the same flow on a spawned task and hand the result to a completion
//! closure on the [`ConsumerQueue`] attached with
//! [`with_consumer`](PhotoStore::with_consumer), exactly once.
//!
//! Ingestion cycles are serialized by an internal lock, so two overlapping
//! fetches never race between lookup and insert for the same photo ID.
//! Reads (`fetch_all_photos`, `find_photo`) are not blocked by it and see
//! the latest committed state.

use std::sync::Arc;

use photorama_core::decode::decode_photos;
use photorama_core::flickr::FlickrApi;
use photorama_core::models::PhotoRecord;
use photorama_core::reconcile::{reconcile, Reconciled};
use photorama_core::store::Store;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::consumer::ConsumerQueue;
use crate::error::{FetchError, ImageResult, PhotosResult};
use crate::image::PhotoImage;
use crate::sqlite_store::SqliteStore;
use crate::transport::{HttpTransport, Transport};

pub struct PhotoStore {
    api: FlickrApi,
    listing_params: Vec<(String, String)>,
    transport: Arc<dyn Transport>,
    store: Arc<dyn Store>,
    consumer: Option<ConsumerQueue>,
    ingest_lock: Mutex<()>,
}

impl PhotoStore {
    pub fn new(api: FlickrApi, transport: Arc<dyn Transport>, store: Arc<dyn Store>) -> Self {
        Self {
            api,
            listing_params: Vec::new(),
            transport,
            store,
            consumer: None,
            ingest_lock: Mutex::new(()),
        }
    }

    /// Wire up the production stack: SQLite store at `db.path` (schema
    /// applied if missing), `reqwest` transport, and the configured
    /// Flickr endpoint.
    ///
    /// # Errors
    ///
    /// Fails without an API key, since every flow here may call Flickr.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api = config.flickr_api()?;
        let store = SqliteStore::open(config).await?;
        let transport = HttpTransport::new(&config.http)?;

        Ok(Self::new(api, Arc::new(transport), Arc::new(store))
            .with_listing_params(config.listing_params()))
    }

    /// Deliver `*_with` completions on `consumer`.
    pub fn with_consumer(mut self, consumer: ConsumerQueue) -> Self {
        self.consumer = Some(consumer);
        self
    }

    /// Extra parameters appended to every listing request (e.g. `per_page`).
    pub fn with_listing_params(mut self, params: Vec<(String, String)>) -> Self {
        self.listing_params = params;
        self
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Run one ingestion cycle and report what reconciliation did.
    ///
    /// Nothing is persisted unless every step succeeds: a commit failure
    /// turns a successful decode into [`FetchError::Storage`].
    pub async fn ingest_interesting_photos(&self) -> Result<Reconciled, FetchError> {
        let params: Vec<(&str, &str)> = self
            .listing_params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let url = self.api.interesting_photos_url(&params);

        let payload = self.transport.get(&url).await?;
        let photos = decode_photos(&payload)?;

        let _cycle = self.ingest_lock.lock().await;
        let mut tx = self.store.begin().await?;
        let reconciled = reconcile(tx.as_mut(), &photos).await?;
        if let Err(e) = tx.commit().await {
            tracing::warn!(error = %e, photos = photos.len(), "commit failed; batch discarded");
            return Err(e.into());
        }

        Ok(reconciled)
    }

    /// Fetch interesting photos; one record per decoded photo, in payload
    /// order.
    pub async fn fetch_interesting_photos(&self) -> PhotosResult {
        self.ingest_interesting_photos().await.map(|r| r.records)
    }

    /// Download and validate the image bytes of `record`.
    ///
    /// # Panics
    ///
    /// If `record` has an empty photo ID. Stored records always have one,
    /// so this means the caller built the record by hand.
    pub async fn fetch_image(&self, record: &PhotoRecord) -> ImageResult {
        assert!(
            !record.photo_id.is_empty(),
            "photo expected to have a photo ID"
        );
        let bytes = self.transport.get(&record.remote_url).await?;
        PhotoImage::decode(bytes).await
    }

    /// Every stored record, oldest capture first.
    pub async fn fetch_all_photos(&self) -> PhotosResult {
        Ok(self.store.fetch_all_ordered().await?)
    }

    /// Committed record for `photo_id`, if any.
    pub async fn find_photo(&self, photo_id: &str) -> Result<Option<PhotoRecord>, FetchError> {
        Ok(self.store.find_by_photo_id(photo_id).await?)
    }

    fn consumer(&self) -> ConsumerQueue {
        match &self.consumer {
            Some(consumer) => consumer.clone(),
            None => panic!("no ConsumerQueue attached; call PhotoStore::with_consumer first"),
        }
    }

    /// Callback form of [`fetch_interesting_photos`](Self::fetch_interesting_photos).
    ///
    /// # Panics
    ///
    /// If no consumer queue is attached. The `*_with` variants all check
    /// this on the calling thread.
    pub fn fetch_interesting_photos_with<F>(self: &Arc<Self>, completion: F)
    where
        F: FnOnce(PhotosResult) + Send + 'static,
    {
        let consumer = self.consumer();
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let result = this.fetch_interesting_photos().await;
            consumer.dispatch(move || completion(result));
        });
    }

    /// Callback form of [`fetch_image`](Self::fetch_image).
    ///
    /// The photo-ID precondition is checked on the calling thread.
    pub fn fetch_image_with<F>(self: &Arc<Self>, record: PhotoRecord, completion: F)
    where
        F: FnOnce(ImageResult) + Send + 'static,
    {
        assert!(
            !record.photo_id.is_empty(),
            "photo expected to have a photo ID"
        );
        let consumer = self.consumer();
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let result = this.fetch_image(&record).await;
            consumer.dispatch(move || completion(result));
        });
    }

    /// Callback form of [`fetch_all_photos`](Self::fetch_all_photos).
    pub fn fetch_all_photos_with<F>(self: &Arc<Self>, completion: F)
    where
        F: FnOnce(PhotosResult) + Send + 'static,
    {
        let consumer = self.consumer();
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let result = this.fetch_all_photos().await;
            consumer.dispatch(move || completion(result));
        });
    }
}
