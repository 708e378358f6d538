//! Content-driven page routes backed by a headless CMS.

pub mod cms;
pub mod config;
pub mod http;
pub mod i18n;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod page;

pub use config::schema::SiteConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use page::PageService;
