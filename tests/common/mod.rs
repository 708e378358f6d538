//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use content_pages::{HttpServer, Shutdown, SiteConfig};

/// A page the mock content backend knows about.
#[derive(Clone)]
pub struct MockPage {
    pub slug: &'static str,
    pub lang: Option<&'static str>,
    pub document: Value,
}

/// Slug for which the mock backend answers with a 500.
pub const FAILING_SLUG: &str = "boom";

#[derive(Clone, Default)]
struct MockState {
    pages: Arc<Vec<MockPage>>,
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

/// Handle to a running mock content backend.
pub struct MockCms {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl MockCms {
    /// Query-string pairs of every request received so far.
    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a mock query API on an ephemeral port.
///
/// A page matches when its slug equals `$slug` and, if `$lang` was sent,
/// its language equals `$lang`.
pub async fn start_mock_cms(pages: Vec<MockPage>) -> MockCms {
    let state = MockState {
        pages: Arc::new(pages),
        requests: Arc::default(),
    };
    let requests = state.requests.clone();

    let app = Router::new().fallback(answer_query).with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockCms { addr, requests }
}

async fn answer_query(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.requests.lock().unwrap().push(params.clone());

    let decode = |name: &str| -> Option<String> {
        params.get(name).map(|raw| serde_json::from_str::<String>(raw).unwrap())
    };
    let slug = decode("$slug").unwrap_or_default();
    let lang = decode("$lang");

    if slug == FAILING_SLUG {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": { "description": "backend exploded", "type": "internalError" } })),
        );
    }

    let result = state
        .pages
        .iter()
        .find(|page| page.slug == slug && (lang.is_none() || page.lang == lang.as_deref()))
        .map(|page| page.document.clone())
        .unwrap_or(Value::Null);

    (StatusCode::OK, Json(json!({ "ms": 1, "result": result })))
}

/// Site config pointing at the mock backend, languages `en` and `fr`.
pub fn site_config(cms_addr: SocketAddr) -> SiteConfig {
    let mut config = SiteConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.cms.api_host = Some(format!("http://{cms_addr}"));
    config.cms.use_cdn = false;
    config.cms.timeout_secs = 5;
    config.i18n.languages = vec!["en".to_string(), "fr".to_string()];
    config.i18n.default_language = "en".to_string();
    config.site.base_url = "https://example.com".to_string();
    config.site.title_suffix = " | Example".to_string();
    config
}

/// Handle to a running page server.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<SiteConfig>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the page server on an ephemeral port.
pub async fn start_server(config: SiteConfig) -> TestServer {
    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer {
        addr,
        shutdown,
        config_updates,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// A page document as the page query would return it.
pub fn page_document(id: &str, slug: &str, lang: &str, modules: &[&str]) -> Value {
    json!({
        "_id": id,
        "_type": "page",
        "language": lang,
        "metadata": {
            "slug": { "current": slug },
            "title": format!("Title of {slug}"),
            "description": "A page",
            "ogimage": "https://cdn.example/og.png?w=1200"
        },
        "modules": modules
            .iter()
            .enumerate()
            .map(|(i, kind)| json!({ "_type": kind, "_key": format!("k{i}") }))
            .collect::<Vec<_>>(),
        "translations": []
    })
}
