//! Network setup.
//!
//! Plain TCP listeners are bound with tokio directly; this module only
//! covers loading TLS material for the HTTPS listener.

pub mod tls;
