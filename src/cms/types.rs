//! Query envelope types and error definitions.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while querying the content backend.
#[derive(Debug, Error)]
pub enum CmsError {
    /// Base URL or endpoint could not be built.
    #[error("invalid content API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Token cannot be sent as an Authorization header.
    #[error("content API token is not a valid header value")]
    InvalidToken,

    /// Connection or transport failure.
    #[error("content API request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// No response within the configured timeout.
    #[error("content API timeout after {0} seconds")]
    Timeout(u64),

    /// Backend answered with a non-success status.
    #[error("content API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body was not a query envelope.
    #[error("content API response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for content backend operations.
pub type CmsResult<T> = Result<T, CmsError>;

/// Successful query response body.
#[derive(Debug, Deserialize)]
pub struct QueryEnvelope {
    #[serde(default)]
    pub result: Value,

    /// Server-side execution time in milliseconds.
    #[serde(default)]
    pub ms: Option<u64>,
}

/// Error response body, e.g. `{"error":{"description":"...","type":"queryParseError"}}`.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Longest body excerpt carried in a status error.
const MAX_MESSAGE_LEN: usize = 200;

/// Pull a readable message out of an error response body.
pub fn error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        let detail = envelope.error;
        match (detail.kind, detail.description) {
            (Some(kind), Some(description)) => return format!("{kind}: {description}"),
            (None, Some(description)) => return description,
            (Some(kind), None) => return kind,
            (None, None) => {}
        }
    }

    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_MESSAGE_LEN) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
