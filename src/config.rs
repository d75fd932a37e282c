//! Configuration parsing and validation.
//!
//! Photorama is configured with a TOML file (default `./config/photorama.toml`):
//!
//! ```toml
//! [db]
//! path = "./data/photorama.sqlite"
//! busy_timeout_secs = 5
//!
//! [flickr]
//! base_url = "https://api.flickr.com/services/rest"
//! api_key = "..."      # or FLICKR_API_KEY
//! per_page = 100
//!
//! [http]
//! timeout_secs = 30
//! ```
//!
//! [`load_config`] validates everything that would otherwise fail on every
//! request, so a bad endpoint is reported once at startup. The API key is
//! only required by the commands that call Flickr, when they build a
//! [`FlickrApi`] through [`Config::flickr_api`].

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use photorama_core::flickr::{parse_endpoint, FlickrApi, DEFAULT_BASE_URL};

/// Environment variable consulted when `flickr.api_key` is not set.
pub const API_KEY_ENV: &str = "FLICKR_API_KEY";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub flickr: FlickrConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
    /// How long a connection waits for another writer before giving up.
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,
}

fn default_busy_timeout_secs() -> u64 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct FlickrConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Forwarded as the `per_page` listing parameter when set.
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl Default for FlickrConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            per_page: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    format!("photorama/{}", env!("CARGO_PKG_VERSION"))
}

impl FlickrConfig {
    /// API key from the config file, falling back to [`API_KEY_ENV`].
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

impl Config {
    /// Build the Flickr query builder from this configuration.
    ///
    /// # Errors
    ///
    /// Fails if the base URL is invalid or no API key is available.
    pub fn flickr_api(&self) -> Result<FlickrApi> {
        let api_key = self.flickr.resolve_api_key().with_context(|| {
            format!(
                "no Flickr API key: set flickr.api_key or the {} environment variable",
                API_KEY_ENV
            )
        })?;
        FlickrApi::new(&self.flickr.base_url, api_key).context("Invalid [flickr] configuration")
    }

    /// Extra listing parameters derived from configuration.
    pub fn listing_params(&self) -> Vec<(String, String)> {
        self.flickr
            .per_page
            .map(|n| vec![("per_page".to_string(), n.to_string())])
            .unwrap_or_default()
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    // Endpoint problems surface here, never per request.
    parse_endpoint(&config.flickr.base_url).context("Invalid [flickr] configuration")?;

    if config.db.busy_timeout_secs == 0 {
        bail!("db.busy_timeout_secs must be > 0");
    }

    if config.http.timeout_secs == 0 {
        bail!("http.timeout_secs must be > 0");
    }

    if let Some(per_page) = config.flickr.per_page {
        if !(1..=500).contains(&per_page) {
            bail!("flickr.per_page must be in [1, 500], got {}", per_page);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_src: &str) -> Result<Config> {
        let config: Config = toml::from_str(toml_src)?;
        validate(&config)?;
        Ok(config)
    }

    #[test]
    fn defaults_apply() {
        let cfg = parse(
            r#"
[db]
path = "/tmp/p.sqlite"

[flickr]
api_key = "k"
"#,
        )
        .unwrap();
        assert_eq!(cfg.flickr.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.http.timeout_secs, 30);
        assert!(cfg.listing_params().is_empty());
    }

    #[test]
    fn rejects_bad_base_url() {
        let err = parse(
            r#"
[db]
path = "/tmp/p.sqlite"

[flickr]
base_url = "::nope::"
api_key = "k"
"#,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("invalid Flickr base URL"));
    }

    #[test]
    fn rejects_out_of_range_per_page() {
        let err = parse(
            r#"
[db]
path = "/tmp/p.sqlite"

[flickr]
api_key = "k"
per_page = 0
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("per_page"));
    }

    #[test]
    fn per_page_becomes_listing_param() {
        let cfg = parse(
            r#"
[db]
path = "/tmp/p.sqlite"

[flickr]
api_key = "k"
per_page = 25
"#,
        )
        .unwrap();
        assert_eq!(
            cfg.listing_params(),
            vec![("per_page".to_string(), "25".to_string())]
        );
    }

    #[test]
    fn api_key_is_optional_at_load_time() {
        let cfg = parse(
            r#"
[db]
path = "/tmp/p.sqlite"
"#,
        )
        .unwrap();
        assert_eq!(cfg.db.busy_timeout_secs, 5);
        if std::env::var(API_KEY_ENV).is_err() {
            let err = cfg.flickr_api().unwrap_err();
            assert!(err.to_string().contains(API_KEY_ENV));
        }
    }
}
