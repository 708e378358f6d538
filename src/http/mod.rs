//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware, hot reload)
//!     → request.rs (request ID, request span)
//!     → handlers.rs (route segments → PageService entry points)
//!     → response.rs (Tera page shell, 404 / error pages)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::PageTemplates;
pub use server::{AppState, HttpServer, ServerError};
