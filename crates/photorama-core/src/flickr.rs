//! Flickr REST query builder.
//!
//! Every call to the Flickr REST endpoint carries the same four fixed
//! parameters (`method`, `format=json`, `nojsoncallback=1`, `api_key`),
//! followed by whatever the caller adds for the specific operation.
//!
//! Building a URL never touches the network and never fails: the base
//! endpoint is validated once, when a [`FlickrApi`] is constructed.
//!
//! ```rust
//! use photorama_core::flickr::{FlickrApi, Method};
//!
//! let api = FlickrApi::new("https://api.flickr.com/services/rest", "KEY").unwrap();
//! let url = api.build_request(Method::InterestingPhotos, &[("extras", "url_h,date_taken")]);
//! assert!(url.as_str().contains("method=flickr.interestingness.getList"));
//! ```

use thiserror::Error;
use url::Url;

/// Default public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.flickr.com/services/rest";

/// Extras requested with every photo listing: the high-resolution URL and
/// the capture date.
pub const PHOTO_EXTRAS: &str = "url_h,date_taken";

/// Remote operations this client knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `flickr.interestingness.getList`
    InterestingPhotos,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::InterestingPhotos => "flickr.interestingness.getList",
        }
    }
}

/// Rejected base endpoint.
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("invalid Flickr base URL '{url}': {source}")]
    Parse {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Flickr base URL must be http or https, got '{0}'")]
    Scheme(String),
}

/// Check that `base_url` is an absolute http(s) URL.
///
/// Usable without an API key, so configuration can reject a bad endpoint
/// even for commands that never call Flickr.
pub fn parse_endpoint(base_url: &str) -> Result<Url, EndpointError> {
    let parsed = Url::parse(base_url).map_err(|source| EndpointError::Parse {
        url: base_url.to_string(),
        source,
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(EndpointError::Scheme(parsed.scheme().to_string()));
    }
    Ok(parsed)
}

/// Builds request URLs for the Flickr REST API.
#[derive(Debug, Clone)]
pub struct FlickrApi {
    base_url: Url,
    api_key: String,
}

impl FlickrApi {
    /// Create a builder for `base_url` authenticated with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError`] if `base_url` is not an absolute http(s)
    /// URL. Callers are expected to do this once at startup.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, EndpointError> {
        Ok(Self {
            base_url: parse_endpoint(base_url)?,
            api_key: api_key.into(),
        })
    }

    /// Build the request URL for `method`.
    ///
    /// Fixed parameters come first, in a stable order, then `extra` in the
    /// order given. Extra keys that collide with a fixed key are appended
    /// as-is, so the query then carries both values.
    pub fn build_request(&self, method: Method, extra: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("method", method.as_str())
                .append_pair("format", "json")
                .append_pair("nojsoncallback", "1")
                .append_pair("api_key", &self.api_key);
            for (key, value) in extra {
                query.append_pair(key, value);
            }
        }
        tracing::debug!(method = method.as_str(), path = url.path(), "built Flickr request");
        url
    }

    /// The listing used by ingestion: interesting photos with
    /// [`PHOTO_EXTRAS`], plus any additional parameters such as `per_page`.
    pub fn interesting_photos_url(&self, additional: &[(&str, &str)]) -> Url {
        let mut extra = vec![("extras", PHOTO_EXTRAS)];
        extra.extend_from_slice(additional);
        self.build_request(Method::InterestingPhotos, &extra)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn fixed_parameters_come_first() {
        let api = FlickrApi::new(DEFAULT_BASE_URL, "abc123").unwrap();
        let url = api.build_request(Method::InterestingPhotos, &[]);
        assert_eq!(url.host_str(), Some("api.flickr.com"));
        assert_eq!(url.path(), "/services/rest");
        assert_eq!(
            pairs(&url),
            vec![
                ("method".into(), "flickr.interestingness.getList".into()),
                ("format".into(), "json".into()),
                ("nojsoncallback".into(), "1".into()),
                ("api_key".into(), "abc123".into()),
            ]
        );
    }

    #[test]
    fn interesting_photos_requests_url_and_date_extras() {
        let api = FlickrApi::new(DEFAULT_BASE_URL, "k").unwrap();
        let url = api.interesting_photos_url(&[("per_page", "50")]);
        let p = pairs(&url);
        assert_eq!(p[4], ("extras".into(), "url_h,date_taken".into()));
        assert_eq!(p[5], ("per_page".into(), "50".into()));
    }

    #[test]
    fn colliding_keys_are_sent_twice() {
        let api = FlickrApi::new(DEFAULT_BASE_URL, "k").unwrap();
        let url = api.build_request(Method::InterestingPhotos, &[("format", "xml")]);
        let formats: Vec<String> = pairs(&url)
            .into_iter()
            .filter(|(k, _)| k == "format")
            .map(|(_, v)| v)
            .collect();
        assert_eq!(formats, vec!["json".to_string(), "xml".to_string()]);
    }

    #[test]
    fn rejects_bad_endpoints() {
        assert!(matches!(
            FlickrApi::new("not a url", "k"),
            Err(EndpointError::Parse { .. })
        ));
        assert!(matches!(
            FlickrApi::new("ftp://example.com/rest", "k"),
            Err(EndpointError::Scheme(_))
        ));
        assert!(parse_endpoint("http://localhost:8080/services/rest").is_ok());
    }
}
