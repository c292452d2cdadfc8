//! Startup configuration for a docshelf session.
//!
//! All external endpoints and credentials live in one [`ShelfConfig`],
//! built once at startup (from a TOML file, the environment, or both)
//! and passed by reference into the feed loader and the download proxy.

use std::path::Path;
use std::time::Duration;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding the feed location.
pub const ENV_FEED_URL: &str = "DOCSHELF_FEED_URL";
/// Environment variable holding the shortening-service credential.
pub const ENV_API_KEY: &str = "DOCSHELF_API_KEY";
/// Environment variable holding the logo resource location.
pub const ENV_LOGO_URL: &str = "DOCSHELF_LOGO_URL";
/// Environment variable holding the shortening backend base address.
pub const ENV_BACKEND_URL: &str = "DOCSHELF_BACKEND_URL";
/// Environment variable overriding the request deadline, in seconds.
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "DOCSHELF_REQUEST_TIMEOUT_SECS";

/// Errors from loading or validating configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("missing configuration value: {key}")]
    #[diagnostic(
        code(docshelf::config::missing),
        help("Set `{key}` in the config file or export {env} in the environment.")
    )]
    Missing { key: &'static str, env: &'static str },

    #[error("invalid URL for {key}: \"{value}\" ({message})")]
    #[diagnostic(
        code(docshelf::config::invalid_url),
        help("Use an absolute http:// or https:// URL.")
    )]
    InvalidUrl {
        key: &'static str,
        value: String,
        message: String,
    },

    #[error("invalid value for {key}: \"{value}\"")]
    #[diagnostic(
        code(docshelf::config::invalid_value),
        help("Expected a non-negative integer.")
    )]
    InvalidValue { key: &'static str, value: String },

    #[error("failed to read config file: {path}")]
    #[diagnostic(
        code(docshelf::config::read),
        help("Check that the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    #[diagnostic(
        code(docshelf::config::parse),
        help("The config file must be valid TOML. See `docshelf.example.toml`.")
    )]
    Parse { path: String, message: String },

    #[error("failed to build HTTP client: {message}")]
    #[diagnostic(
        code(docshelf::config::http_client),
        help("The TLS backend could not be initialized on this system.")
    )]
    HttpClient { message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Header names that map feed columns onto record fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedColumns {
    pub id: String,
    pub title: String,
    pub source_link: String,
}

impl Default for FeedColumns {
    fn default() -> Self {
        Self {
            id: "id".into(),
            title: "tenHocPhan".into(),
            source_link: "linkDrive".into(),
        }
    }
}

/// Session-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    /// Location of the published CSV feed.
    pub feed_url: String,
    /// Credential passed to the shortening service.
    pub api_key: String,
    /// Logo shown by presentation consumers.
    pub logo_url: String,
    /// Base address of the service that forwards shortening requests.
    pub backend_url: String,
    /// Deadline for each remote call; 0 disables it.
    pub request_timeout_secs: u64,
    /// Rows per page for paginated listings.
    pub page_size: usize,
    pub columns: FeedColumns,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            feed_url: String::new(),
            api_key: String::new(),
            logo_url: String::new(),
            backend_url: String::new(),
            request_timeout_secs: 30,
            page_size: 15,
            columns: FeedColumns::default(),
        }
    }
}

impl ShelfConfig {
    /// Load from a TOML file. Does not validate.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Build from `DOCSHELF_*` environment variables over the defaults.
    pub fn from_env() -> ConfigResult<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Overwrite fields with any `DOCSHELF_*` variables that are set.
    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        for (env, field) in [
            (ENV_FEED_URL, &mut self.feed_url),
            (ENV_API_KEY, &mut self.api_key),
            (ENV_LOGO_URL, &mut self.logo_url),
            (ENV_BACKEND_URL, &mut self.backend_url),
        ] {
            if let Some(value) = lookup(env) {
                *field = value;
            }
        }
        if let Some(value) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            self.request_timeout_secs =
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "request_timeout_secs",
                        value,
                    })?;
        }
        Ok(())
    }

    /// Check that every required value is present and every URL parses.
    pub fn validate(&self) -> ConfigResult<()> {
        let required = [
            ("feed_url", ENV_FEED_URL, &self.feed_url),
            ("api_key", ENV_API_KEY, &self.api_key),
            ("logo_url", ENV_LOGO_URL, &self.logo_url),
            ("backend_url", ENV_BACKEND_URL, &self.backend_url),
        ];
        for (key, env, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing { key, env });
            }
        }
        for (key, value) in [
            ("feed_url", &self.feed_url),
            ("logo_url", &self.logo_url),
            ("backend_url", &self.backend_url),
        ] {
            check_url(key, value)?;
        }
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "page_size",
                value: "0".into(),
            });
        }
        Ok(())
    }

    /// Per-request deadline, or `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Build the HTTP client shared by the feed loader and the proxy.
    pub fn http_client(&self) -> ConfigResult<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.request_timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(|e| ConfigError::HttpClient {
            message: e.to_string(),
        })
    }
}

fn check_url(key: &'static str, value: &str) -> ConfigResult<()> {
    let url = reqwest::Url::parse(value.trim()).map_err(|e| ConfigError::InvalidUrl {
        key,
        value: value.to_string(),
        message: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidUrl {
            key,
            value: value.to_string(),
            message: format!("unsupported scheme `{other}`"),
        }),
    }
}
