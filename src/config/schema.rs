//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the page
//! service. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the page service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Content backend connection settings.
    pub cms: CmsConfig,

    /// Supported languages.
    pub i18n: I18nConfig,

    /// Page query composition.
    pub query: QueryConfig,

    /// Site-wide values used when deriving page metadata.
    pub site: SiteMetaConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Which document versions the backend should answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Perspective {
    #[default]
    Published,
    PreviewDrafts,
    Raw,
}

impl Perspective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Perspective::Published => "published",
            Perspective::PreviewDrafts => "previewDrafts",
            Perspective::Raw => "raw",
        }
    }
}

/// Content backend (Content Lake) connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CmsConfig {
    /// Project identifier, the first label of the API hostname.
    pub project_id: String,

    /// Dataset to query (e.g., "production").
    pub dataset: String,

    /// API version, either a date ("2024-10-01") or "1".
    pub api_version: String,

    /// Query the CDN edge instead of the live API.
    pub use_cdn: bool,

    /// Bearer token for private datasets or draft perspectives.
    pub token: Option<String>,

    /// Full base URL override (e.g., "http://127.0.0.1:4000").
    /// When set, `project_id` and `use_cdn` do not affect the hostname.
    pub api_host: Option<String>,

    /// Query timeout in seconds.
    pub timeout_secs: u64,

    /// Perspective passed with every query.
    pub perspective: Perspective,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: "production".to_string(),
            api_version: "2024-10-01".to_string(),
            use_cdn: true,
            token: None,
            api_host: None,
            timeout_secs: 10,
            perspective: Perspective::Published,
        }
    }
}

/// Supported languages.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Known language codes, in display order.
    pub languages: Vec<String>,

    /// Language assumed when the path carries no prefix.
    pub default_language: String,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            default_language: "en".to_string(),
        }
    }
}

/// Page query composition.
///
/// The projection fragments are operator-owned GROQ text; request values
/// never reach them and are bound as query parameters instead.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Width appended to the Open Graph image URL.
    pub og_image_width: u32,

    /// `global-module` path selecting site-wide modules.
    pub global_path: String,

    /// `global-module` path selecting modules for this route.
    pub page_path: String,

    /// Projection applied to every module.
    pub modules_projection: String,

    /// Projection applied to inline images in the page body.
    pub image_projection: String,

    /// Projection resolving translation links.
    pub translations_projection: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            og_image_width: 1200,
            global_path: "*".to_string(),
            page_path: "/".to_string(),
            modules_projection: "...,\n\
                 ctas[]{ ..., link{ ..., internal->{ _type, title, metadata } } },\n\
                 _type == 'hero' => { assets[]{ ..., asset-> } }"
                .to_string(),
            image_projection: "..., 'lqip': asset->metadata.lqip".to_string(),
            translations_projection: "'translations': *[_type == 'translation.metadata' && references(^._id)]\
                 .translations[].value->{ 'slug': metadata.slug.current, language }"
                .to_string(),
        }
    }
}

/// Site-wide values used when deriving page metadata.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteMetaConfig {
    /// Public origin, used for canonical and alternate links.
    pub base_url: String,

    /// Appended to every page title (e.g., " | Example").
    pub title_suffix: String,
}

impl Default for SiteMetaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            title_suffix: String::new(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
