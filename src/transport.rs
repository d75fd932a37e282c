//! Outbound HTTP.
//!
//! The orchestrator only ever issues plain GETs and wants the body back.
//! [`Transport`] is that seam and [`HttpTransport`] is its `reqwest`
//! implementation.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use photorama_core::Url;
use thiserror::Error;

use crate::config::HttpConfig;

/// The remote side never produced a usable body.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Issues a GET and returns the response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<Bytes, TransportError>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a client with the configured timeout and user agent.
    pub fn new(config: &HttpConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

/// Path and host only; Flickr URLs carry the API key in the query.
fn redacted(url: &Url) -> String {
    format!("{}://{}{}", url.scheme(), url.host_str().unwrap_or(""), url.path())
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<Bytes, TransportError> {
        let request_err = |source: reqwest::Error| TransportError::Request {
            url: redacted(url),
            source: source.without_url(),
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(request_err)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %redacted(url), status = status.as_u16(), "non-success response");
            return Err(TransportError::Status {
                url: redacted(url),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(request_err)?;
        tracing::debug!(url = %redacted(url), bytes = body.len(), "fetched");
        Ok(body)
    }
}
