//! Language handling.
//!
//! # Data Flow
//! ```text
//! Route path segments ["fr", "blog", "post-1"]
//!     → languages.rs (membership test against the configured set)
//!     → slug.rs (strip leading language, join the rest)
//!     → ResolvedSlug { slug: "blog/post-1", lang: Some("fr") }
//! ```
//!
//! # Design Decisions
//! - The language set is injected from config, never a process-wide constant
//! - Only the first segment is ever treated as a language
//! - Resolution is a pure function of (segments, languages)

pub mod languages;
pub mod slug;

pub use languages::Languages;
pub use slug::{resolve_slug, ResolvedSlug, SlugError};
