//! Download proxy: trade a record's source link for a shortened link.
//!
//! Each call asks the external shortening service, via the configured
//! backend, for a monetized short link to one record's document. The proxy
//! owns the per-record [`ProxyState`] map:
//!
//! - `Idle -> InFlight` when a request starts
//! - `InFlight -> Idle` when it ends, whatever the outcome
//!
//! A second request for a record that is already in flight is rejected
//! with [`LibraryError::AlreadyInFlight`]. Requests for different records
//! run concurrently and share nothing but the state map.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::config::{ConfigError, ShelfConfig};
use crate::library::error::{LibraryError, LibraryResult};
use crate::library::model::{CatalogRecord, ProxyState, RecordId};

/// Path of the shortening endpoint under the backend base address.
pub const SHORTEN_PATH: &str = "/api/shorten";

const INVALID_RESPONSE: &str = "no valid shortened link in response";

/// JSON body returned by the shortening service.
///
/// Decoded from a loose `serde_json::Value` so a provider that sends a
/// non-string `status` or `message` still has its message surfaced.
#[derive(Debug)]
struct ShortenResponse {
    status: Option<String>,
    shortened_url: Option<String>,
    message: Option<String>,
}

impl ShortenResponse {
    fn from_value(value: &serde_json::Value) -> Self {
        let text = |key: &str| match value.get(key) {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };
        Self {
            status: text("status"),
            shortened_url: value
                .get("shortenedUrl")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
            message: text("message"),
        }
    }

    /// The shortened link, or the cause of failure.
    fn into_link(self) -> Result<String, String> {
        let success = self.status.as_deref() == Some("success");
        match self.shortened_url {
            Some(link) if success && !link.trim().is_empty() => Ok(link.trim().to_string()),
            _ => Err(self
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| INVALID_RESPONSE.to_string())),
        }
    }
}

/// Per-record orchestrator for shortened download links.
pub struct DownloadProxy {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    api_key: String,
    states: DashMap<RecordId, ProxyState>,
}

impl DownloadProxy {
    /// Create a proxy for the configured backend and credential.
    pub fn new(config: &ShelfConfig) -> LibraryResult<Self> {
        Self::with_client(config, config.http_client()?)
    }

    /// Create a proxy that shares an existing HTTP client.
    pub fn with_client(config: &ShelfConfig, client: reqwest::Client) -> LibraryResult<Self> {
        let base = config.backend_url.trim().trim_end_matches('/');
        let endpoint = reqwest::Url::parse(&format!("{base}{SHORTEN_PATH}")).map_err(|e| {
            ConfigError::InvalidUrl {
                key: "backend_url",
                value: config.backend_url.clone(),
                message: e.to_string(),
            }
        })?;
        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            states: DashMap::new(),
        })
    }

    /// Current state of a record.
    pub fn state(&self, id: RecordId) -> ProxyState {
        self.states
            .get(&id)
            .map(|s| *s)
            .unwrap_or(ProxyState::Idle)
    }

    /// Records with a request outstanding, ascending by id.
    pub fn in_flight(&self) -> Vec<RecordId> {
        let mut ids: Vec<RecordId> = self
            .states
            .iter()
            .filter(|e| *e.value() == ProxyState::InFlight)
            .map(|e| *e.key())
            .collect();
        ids.sort();
        ids
    }

    /// Full request URL for a source link, credential included.
    pub fn request_url(&self, source_link: &str) -> reqwest::Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("api", &self.api_key)
            .append_pair("url", source_link);
        url
    }

    /// Obtain a shortened link for `record`.
    ///
    /// The record is `InFlight` for the duration of the call and `Idle`
    /// again once the returned future completes or is dropped.
    pub async fn request_link(&self, record: &CatalogRecord) -> LibraryResult<String> {
        let _guard = self.begin(record.id)?;
        tracing::debug!(id = %record.id, "requesting shortened link");

        match self.shorten(&record.source_link).await {
            Ok(link) => {
                tracing::info!(id = %record.id, link = %link, "shortened link ready");
                Ok(link)
            }
            Err(cause) => {
                tracing::warn!(id = %record.id, cause = %cause, "shortening failed");
                Err(LibraryError::ShortenFailed {
                    id: record.id,
                    cause,
                })
            }
        }
    }

    fn begin(&self, id: RecordId) -> LibraryResult<InFlightGuard<'_>> {
        match self.states.entry(id) {
            Entry::Occupied(mut entry) => {
                if *entry.get() == ProxyState::InFlight {
                    return Err(LibraryError::AlreadyInFlight { id });
                }
                entry.insert(ProxyState::InFlight);
            }
            Entry::Vacant(entry) => {
                entry.insert(ProxyState::InFlight);
            }
        }
        Ok(InFlightGuard {
            states: &self.states,
            id,
        })
    }

    async fn shorten(&self, source_link: &str) -> Result<String, String> {
        let response = self
            .client
            .get(self.request_url(source_link))
            .send()
            .await
            .map_err(|e| format!("transport error: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("request failed (status: {})", status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| format!("transport error: {e}"))?;
        match serde_json::from_slice::<serde_json::Value>(&body) {
            Ok(value) => ShortenResponse::from_value(&value).into_link(),
            Err(e) => {
                tracing::debug!(error = %e, "shortening response is not valid JSON");
                Err(INVALID_RESPONSE.to_string())
            }
        }
    }
}

/// Returns a record to `Idle` when dropped.
struct InFlightGuard<'a> {
    states: &'a DashMap<RecordId, ProxyState>,
    id: RecordId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.states.remove(&self.id);
    }
}
