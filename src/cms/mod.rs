//! Content backend subsystem.
//!
//! # Data Flow
//! ```text
//! ResolvedSlug { slug, lang }
//!     → query.rs (compose GROQ text, bind $slug/$lang as parameters)
//!     → client.rs (HTTP query API, GET or POST by size)
//!     → types.rs (envelope decoding, error mapping)
//!     → serde_json::Value (document or null)
//! ```
//!
//! # Design Decisions
//! - Request values are always bound parameters, never spliced into GROQ
//! - One query per call; no retries and no caching at this layer
//! - `ContentSource` is the seam tests replace with an in-memory backend

pub mod client;
pub mod query;
pub mod types;

use async_trait::async_trait;
use serde_json::Value;

pub use client::SanityClient;
pub use query::{GroqQuery, ModuleGroup, PageQueryBuilder, MODULE_GROUPS};
pub use types::{CmsError, CmsResult};

/// Anything that can answer a GROQ query.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Run the query and return its `result` value (`Value::Null` when empty).
    async fn query(&self, query: &GroqQuery) -> CmsResult<Value>;
}
