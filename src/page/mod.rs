//! Page subsystem.
//!
//! # Data Flow
//! ```text
//! Route segments
//!     → i18n::resolve_slug (slug + optional language)
//!     → fetch.rs (one page query through the ContentSource)
//!     → dispatch.rs
//!         → None: PageError::NotFound (delegates never called)
//!         → Some(document):
//!             render_page       → render.rs   (ModuleRenderer)
//!             generate_metadata → metadata.rs (MetadataProcessor)
//! ```
//!
//! # Design Decisions
//! - The two entry points fetch independently; no per-request memoization
//! - An absent document is an outcome, not an error from the backend
//! - Module order is whatever the query produced; nothing here reorders it

pub mod dispatch;
pub mod document;
pub mod fetch;
pub mod metadata;
pub mod render;

pub use dispatch::{PageError, PageService};
pub use document::{DocumentMetadata, Module, PageDocument, Translation};
pub use metadata::{DefaultMetadataProcessor, MetadataProcessor, PageMetadata};
pub use render::{HtmlModuleRenderer, ModuleRenderer};
