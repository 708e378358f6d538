//! Route handlers.
//!
//! Each handler takes a snapshot of the current `PageService`, so a config
//! reload never changes the service under an in-flight request.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::http::server::AppState;
use crate::i18n::slug::path_segments;
use crate::page::PageError;

/// Slug of the page served at `/`.
pub const INDEX_SLUG: &str = "index";

/// `GET /{*slug}`: the full HTML page.
pub async fn page(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    render(state, path_segments(&path)).await
}

/// `GET /`: the `index` page.
pub async fn index(State(state): State<AppState>) -> Response {
    render(state, vec![INDEX_SLUG.to_string()]).await
}

async fn render(state: AppState, segments: Vec<String>) -> Response {
    let service = state.pages.load_full();

    // Metadata and body are independent calls, each with its own fetch.
    let (metadata, body) = tokio::join!(
        service.generate_metadata(&segments),
        service.render_page(&segments)
    );

    match (metadata, body) {
        (Ok(meta), Ok(rendered)) => state.templates.page_response(&meta, &rendered.html),
        (Err(e), _) | (_, Err(e)) => state.templates.error_response(e),
    }
}

/// `GET /_metadata/{*slug}`: derived page metadata as JSON.
pub async fn metadata(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    let service = state.pages.load_full();
    match service.generate_metadata(&path_segments(&path)).await {
        Ok(meta) => Json(meta).into_response(),
        Err(PageError::NotFound) => {
            (StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" }))).into_response()
        }
        Err(e) => state.templates.error_response(e),
    }
}

/// `GET /healthz`.
pub async fn health() -> &'static str {
    "ok"
}
