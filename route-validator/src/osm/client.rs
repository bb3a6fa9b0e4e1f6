//! OSM API HTTP client.
//!
//! Read-only access to the versioned REST API. Every request carries a
//! user agent identifying the caller and a short fixed timeout.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::batch::DEFAULT_PARALLEL_REQUESTS;
use super::error::OsmError;
use super::source::ElementSource;
use super::types::{ElementsResponse, Node, Relation, Way};

/// Default base URL for the OSM API.
const DEFAULT_BASE_URL: &str = "https://api.openstreetmap.org/api/0.6";

/// Default user agent sent when the caller does not supply one.
const DEFAULT_USER_AGENT: &str = concat!("route-validator/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 3;

/// Configuration for the OSM client.
#[derive(Debug, Clone)]
pub struct OsmConfig {
    /// Value of the `User-Agent` header
    pub user_agent: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum in-flight requests during batch loads
    pub parallel_requests: usize,
}

impl OsmConfig {
    /// Create a new config with the given user agent.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            parallel_requests: DEFAULT_PARALLEL_REQUESTS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the batch-load pool size.
    pub fn with_parallel_requests(mut self, n: usize) -> Self {
        self.parallel_requests = n;
        self
    }
}

impl Default for OsmConfig {
    fn default() -> Self {
        Self::new(DEFAULT_USER_AGENT)
    }
}

/// OSM API client.
///
/// Holds no element cache of its own; wrap it in a
/// [`CachedSource`](super::CachedSource) for each validation pass.
#[derive(Debug, Clone)]
pub struct OsmClient {
    http: reqwest::Client,
    base_url: String,
    parallel_requests: usize,
}

impl OsmClient {
    /// Create a new OSM client with the given configuration.
    pub fn new(config: OsmConfig) -> Result<Self, OsmError> {
        let mut headers = HeaderMap::new();
        let user_agent =
            HeaderValue::from_str(&config.user_agent).map_err(|_| OsmError::InvalidHeader)?;
        headers.insert(USER_AGENT, user_agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            parallel_requests: config.parallel_requests,
        })
    }

    /// Maximum in-flight requests during batch loads.
    pub fn parallel_requests(&self) -> usize {
        self.parallel_requests
    }

    /// GET `{base_url}/{path}` and unwrap the `elements` envelope.
    async fn fetch_elements<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, OsmError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "fetching");

        let response = self.http.get(&url).send().await.map_err(classify)?;
        let status = response.status();

        if status == reqwest::StatusCode::GONE {
            return Err(OsmError::Gone);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OsmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(classify)?;

        let parsed: ElementsResponse<T> =
            serde_json::from_str(&body).map_err(|e| OsmError::Json {
                message: e.to_string(),
            })?;

        Ok(parsed.elements)
    }

    /// Fetch a single element and take the first entry of the envelope.
    async fn fetch_one<T: DeserializeOwned>(&self, path: &str) -> Result<T, OsmError> {
        self.fetch_elements(path)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| OsmError::Malformed(format!("no elements in response for {path}")))
    }
}

/// Map a transport error, separating timeouts from other failures.
fn classify(err: reqwest::Error) -> OsmError {
    if err.is_timeout() {
        OsmError::Timeout
    } else {
        OsmError::Http(err)
    }
}

impl ElementSource for OsmClient {
    async fn get_relation(&self, id: i64) -> Result<Relation, OsmError> {
        self.fetch_one(&format!("relation/{id}.json")).await
    }

    async fn get_way(&self, id: i64) -> Result<Way, OsmError> {
        self.fetch_one(&format!("way/{id}.json")).await
    }

    async fn get_node(&self, id: i64) -> Result<Node, OsmError> {
        self.fetch_one(&format!("node/{id}.json")).await
    }

    async fn get_parent_relations(&self, id: i64) -> Result<Vec<Relation>, OsmError> {
        self.fetch_elements(&format!("relation/{id}/relations.json"))
            .await
    }
}
