//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve over plain TCP or TLS with graceful shutdown
//! - Swap in a new PageService when the config file changes

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{routing::get, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::cms::CmsError;
use crate::config::SiteConfig;
use crate::http::handlers;
use crate::http::request::make_request_span;
use crate::http::response::PageTemplates;
use crate::page::PageService;

/// How long in-flight requests may take to finish after shutdown over TLS.
const TLS_DRAIN_SECS: u64 = 10;

/// Why the server could not be built.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Cms(#[from] CmsError),

    #[error("page templates failed to compile: {0}")]
    Templates(#[from] tera::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pages: Arc<ArcSwap<PageService>>,
    pub templates: PageTemplates,
}

impl AppState {
    pub fn new(service: PageService, templates: PageTemplates) -> Self {
        Self {
            pages: Arc::new(ArcSwap::from_pointee(service)),
            templates,
        }
    }
}

/// HTTP server for the page routes.
pub struct HttpServer {
    router: Router,
    config: SiteConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a server whose pages come from the configured content backend.
    pub fn new(config: SiteConfig) -> Result<Self, ServerError> {
        let service = PageService::from_config(&config)?;
        Self::with_service(config, service)
    }

    /// Create a server around an already-built page service.
    pub fn with_service(config: SiteConfig, service: PageService) -> Result<Self, ServerError> {
        let state = AppState::new(service, PageTemplates::new()?);
        let router = Self::build_router(&config, state.clone());
        Ok(Self {
            router,
            config,
            state,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &SiteConfig, state: AppState) -> Router {
        Router::new()
            .route("/healthz", get(handlers::health))
            .route("/_metadata/{*slug}", get(handlers::metadata))
            .route("/", get(handlers::index))
            .route("/{*slug}", get(handlers::page))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The router, for serving elsewhere or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<SiteConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        self.spawn_reloader(config_updates, shutdown.resubscribe());

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server over TLS on `addr` until `shutdown` fires.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: axum_server::tls_rustls::RustlsConfig,
        config_updates: mpsc::UnboundedReceiver<SiteConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, "HTTPS server starting");

        self.spawn_reloader(config_updates, shutdown.resubscribe());

        let handle = axum_server::Handle::new();
        let signal_handle = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            signal_handle.graceful_shutdown(Some(Duration::from_secs(TLS_DRAIN_SECS)));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }

    /// Rebuild the page service for each validated config update.
    fn spawn_reloader(
        &self,
        mut config_updates: mpsc::UnboundedReceiver<SiteConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        let state = self.state.clone();
        let bind_address = self.config.listener.bind_address.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    update = config_updates.recv() => {
                        let Some(new_config) = update else { break };
                        if new_config.listener.bind_address != bind_address {
                            tracing::warn!(
                                bind_address = %new_config.listener.bind_address,
                                "Listener changes take effect on restart"
                            );
                        }
                        match PageService::from_config(&new_config) {
                            Ok(service) => {
                                state.pages.store(Arc::new(service));
                                tracing::info!(
                                    languages = new_config.i18n.languages.len(),
                                    "Page service reloaded"
                                );
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "Failed to apply reloaded config, keeping current service");
                            }
                        }
                    }
                    _ = shutdown.recv() => break,
                }
            }
        });
    }
}
