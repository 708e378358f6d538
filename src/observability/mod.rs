//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields (slug, lang, request id) rather than formatted strings
//! - Request ID flows from the HTTP layer into every page span
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
