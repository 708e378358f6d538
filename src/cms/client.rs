//! Content Lake HTTP query client with timeout and error handling.
//!
//! # Responsibilities
//! - Build the query endpoint for a project/dataset/API version
//! - Encode GROQ parameters (`$name=<json>`) on the query string
//! - Fall back to POST when the GET URL would be too long
//! - Map transport, status and decode failures to `CmsError`

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde_json::{json, Value};
use url::Url;

use crate::cms::query::GroqQuery;
use crate::cms::types::{error_message, CmsError, CmsResult, QueryEnvelope};
use crate::cms::ContentSource;
use crate::config::CmsConfig;
use crate::observability::metrics;

/// GET requests whose URL exceeds this length are sent as POST instead.
const MAX_GET_URL_LEN: usize = 11_264;

/// HTTP client for the content backend query API.
#[derive(Clone)]
pub struct SanityClient {
    http: reqwest::Client,
    endpoint: Url,
    config: CmsConfig,
}

impl SanityClient {
    /// Create a new client.
    ///
    /// No request is made here; an unreachable backend surfaces on the
    /// first query.
    pub fn new(config: CmsConfig) -> CmsResult<Self> {
        let endpoint = query_endpoint(&config)?;

        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| CmsError::InvalidToken)?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("content-pages/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CmsError::Request)?;

        tracing::info!(
            endpoint = %endpoint,
            perspective = config.perspective.as_str(),
            authenticated = config.token.is_some(),
            "Content client initialized"
        );

        Ok(Self {
            http,
            endpoint,
            config,
        })
    }

    /// The query endpoint, without query string.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The GET URL for a query, with parameters JSON-encoded.
    pub fn query_url(&self, query: &GroqQuery) -> CmsResult<Url> {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", &query.query);
            for (name, value) in &query.params {
                pairs.append_pair(&format!("${name}"), &serde_json::to_string(value)?);
            }
            pairs.append_pair("perspective", self.config.perspective.as_str());
            pairs.append_pair("returnQuery", "false");
        }
        Ok(url)
    }

    async fn send(&self, query: &GroqQuery) -> CmsResult<Value> {
        let url = self.query_url(query)?;
        let request = if url.as_str().len() > MAX_GET_URL_LEN {
            let mut post_url = self.endpoint.clone();
            post_url
                .query_pairs_mut()
                .append_pair("perspective", self.config.perspective.as_str());
            tracing::debug!(url_len = url.as_str().len(), "Query too long for GET, using POST");
            self.http
                .post(post_url)
                .json(&json!({ "query": query.query, "params": query.params }))
        } else {
            self.http.get(url)
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                CmsError::Timeout(self.config.timeout_secs)
            } else {
                CmsError::Request(e)
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(CmsError::Request)?;

        if status != StatusCode::OK {
            return Err(CmsError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let envelope: QueryEnvelope = serde_json::from_str(&body)?;
        tracing::debug!(server_ms = ?envelope.ms, "Query answered");
        Ok(envelope.result)
    }
}

#[async_trait]
impl ContentSource for SanityClient {
    async fn query(&self, query: &GroqQuery) -> CmsResult<Value> {
        let start = Instant::now();
        let result = self.send(query).await;
        metrics::record_cms_query(start, result.is_ok());
        result
    }
}

impl std::fmt::Debug for SanityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanityClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("perspective", &self.config.perspective)
            .field("timeout_secs", &self.config.timeout_secs)
            .finish()
    }
}

/// `{base}/v{version}/data/query/{dataset}`.
fn query_endpoint(config: &CmsConfig) -> CmsResult<Url> {
    let base = match &config.api_host {
        Some(host) => host.trim_end_matches('/').to_string(),
        None => {
            let api = if config.use_cdn { "apicdn" } else { "api" };
            format!("https://{}.{api}.sanity.io", config.project_id)
        }
    };
    let version = config.api_version.trim_start_matches('v');
    Ok(Url::parse(&format!(
        "{base}/v{version}/data/query/{}",
        config.dataset
    ))?)
}
