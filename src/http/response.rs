//! Response building.
//!
//! # Responsibilities
//! - Render the HTML page shell (Tera) from page metadata and rendered modules
//! - Map `PageError` to status codes: not-found → 404, anything else → 500
//!
//! # Design Decisions
//! - Backend failures never leak details to the client; they are logged
//! - The not-found page is a normal HTML page, not an empty body
//! - Templates autoescape with the same `escape_html` the module renderer uses

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tera::{Context, Tera};

use crate::page::render::escape_html;
use crate::page::{PageError, PageMetadata};

const PAGE_TEMPLATE: &str = "page.html";
const NOT_FOUND_TEMPLATE: &str = "not_found.html";
const ERROR_TEMPLATE: &str = "error.html";

/// The compiled page templates, shared by all handlers.
#[derive(Clone)]
pub struct PageTemplates {
    tera: Arc<Tera>,
}

impl PageTemplates {
    /// Compile the built-in templates.
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (PAGE_TEMPLATE, include_str!("../../templates/page.html")),
            (NOT_FOUND_TEMPLATE, include_str!("../../templates/not_found.html")),
            (ERROR_TEMPLATE, include_str!("../../templates/error.html")),
        ])?;
        tera.set_escape_fn(escape_html);

        tracing::debug!(count = tera.get_template_names().count(), "Page templates loaded");
        Ok(Self { tera: Arc::new(tera) })
    }

    /// A complete HTML page: `<head>` from `meta`, `<main>` from `body`.
    ///
    /// `body` is inserted as-is; it is already escaped by the module renderer.
    pub fn render_page(&self, meta: &PageMetadata, body: &str) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("meta", meta);
        context.insert("body", body);
        self.tera.render(PAGE_TEMPLATE, &context)
    }

    pub fn page_response(&self, meta: &PageMetadata, body: &str) -> Response {
        match self.render_page(meta, body) {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Page template failed");
                self.fixed_page(StatusCode::INTERNAL_SERVER_ERROR, ERROR_TEMPLATE)
            }
        }
    }

    pub fn error_response(&self, err: PageError) -> Response {
        match err {
            PageError::NotFound => self.fixed_page(StatusCode::NOT_FOUND, NOT_FOUND_TEMPLATE),
            err => {
                tracing::error!(error = %err, "Page request failed");
                self.fixed_page(StatusCode::INTERNAL_SERVER_ERROR, ERROR_TEMPLATE)
            }
        }
    }

    fn fixed_page(&self, status: StatusCode, template: &str) -> Response {
        match self.tera.render(template, &Context::new()) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!(template, error = %e, "Fixed page template failed");
                status.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::cms::CmsError;

    fn meta() -> PageMetadata {
        PageMetadata {
            title: "About \"us\" <3".to_string(),
            description: Some("Who we are".to_string()),
            canonical: "https://example.com/fr/about".to_string(),
            og_image: Some("https://cdn.example/og.png?w=1200".to_string()),
            index: false,
            lang: "fr".to_string(),
            alternates: BTreeMap::from([
                ("de".to_string(), "https://example.com/de/about".to_string()),
                ("en".to_string(), "https://example.com/about".to_string()),
            ]),
        }
    }

    #[test]
    fn test_page_head() {
        let templates = PageTemplates::new().unwrap();
        let html = templates.render_page(&meta(), "<section></section>").unwrap();

        assert!(html.starts_with("<!doctype html>\n<html lang=\"fr\">"));
        assert!(html.contains("<title>About &quot;us&quot; &lt;3</title>"));
        assert!(html.contains("<meta name=\"description\" content=\"Who we are\">"));
        assert!(html.contains("<meta name=\"robots\" content=\"noindex\">"));
        assert!(html.contains("og:image\" content=\"https://cdn.example/og.png?w=1200\""));
        assert!(html.contains("<link rel=\"canonical\" href=\"https://example.com/fr/about\">"));
        assert!(html.contains("<main><section></section></main>"));

        let de = html.find("hreflang=\"de\" href=\"https://example.com/de/about\"").unwrap();
        let en = html.find("hreflang=\"en\" href=\"https://example.com/about\"").unwrap();
        assert!(de < en);
    }

    #[test]
    fn test_optional_head_entries_omitted() {
        let mut meta = meta();
        meta.description = None;
        meta.og_image = None;
        meta.index = true;
        meta.alternates.clear();

        let html = PageTemplates::new().unwrap().render_page(&meta, "").unwrap();
        assert!(!html.contains("description"));
        assert!(!html.contains("og:image"));
        assert!(!html.contains("noindex"));
        assert!(!html.contains("hreflang"));
    }

    #[test]
    fn test_error_status_codes() {
        let templates = PageTemplates::new().unwrap();
        assert_eq!(
            templates.error_response(PageError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            templates
                .error_response(PageError::Backend(CmsError::Timeout(1)))
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
