//! Content page server.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────┐
//!                     │                 PAGE SERVER                    │
//!   GET /fr/blog/x    │  ┌────────┐   ┌──────────┐   ┌─────────────┐  │
//!   ──────────────────┼─▶│  http  │──▶│   i18n   │──▶│    page     │  │
//!                     │  │ server │   │ resolver │   │  dispatch   │  │
//!                     │  └────────┘   └──────────┘   └──────┬──────┘  │
//!                     │                                     │         │
//!                     │                                     ▼         │      ┌─────────┐
//!                     │                              ┌─────────────┐  │ GROQ │ content │
//!                     │                              │ cms client  │──┼─────▶│ backend │
//!                     │                              └──────┬──────┘  │      └─────────┘
//!   HTML / 404        │  ┌──────────┐   ┌─────────────┐     │         │
//!   ◀─────────────────┼──│ response │◀──│ render +    │◀────┘         │
//!                     │  │          │   │ metadata    │               │
//!                     │  └──────────┘   └─────────────┘               │
//!                     │                                               │
//!                     │   config (+ hot reload) · observability ·     │
//!                     │   lifecycle                                   │
//!                     └───────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use content_pages::config::loader::{load_config_with, ConfigOverrides};
use content_pages::config::watcher::ConfigWatcher;
use content_pages::lifecycle::signals::shutdown_on_signal;
use content_pages::net::tls::load_tls_config;
use content_pages::observability::{logging, metrics};
use content_pages::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "content-pages")]
#[command(about = "Serve CMS-backed pages", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "CONTENT_PAGES_CONFIG")]
    config: PathBuf,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Reload the configuration when the file changes.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        bind_address: cli.bind,
    };
    let config = load_config_with(&cli.config, &overrides)?;

    logging::init_logging(&config.observability);

    tracing::info!("content-pages v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        dataset = %config.cms.dataset,
        languages = ?config.i18n.languages,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // The watcher handle must outlive the server.
    let (_watcher, config_updates) = if cli.watch {
        let (watcher, updates) = ConfigWatcher::new(&cli.config, overrides);
        (Some(watcher.run()?), updates)
    } else {
        (None, mpsc::unbounded_channel().1)
    };

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown_on_signal(shutdown.clone()));

    let tls = config.listener.tls.clone();
    let server = HttpServer::new(config)?;

    match tls {
        Some(tls) => {
            let addr: SocketAddr = server.config().listener.bind_address.parse()?;
            let rustls = load_tls_config(&tls).await?;
            server
                .run_tls(addr, rustls, config_updates, shutdown.subscribe())
                .await?;
        }
        None => {
            let listener = TcpListener::bind(&server.config().listener.bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");
            server.run(listener, config_updates, shutdown.subscribe()).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
