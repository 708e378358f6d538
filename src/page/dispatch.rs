//! Render and metadata entry points.
//!
//! # Responsibilities
//! - Resolve route segments to a slug and language
//! - Fetch the page document once per entry-point call
//! - Signal not-found before any delegate runs
//! - Hand the document to the renderer or the metadata processor

use std::sync::Arc;

use thiserror::Error;

use crate::cms::{CmsError, ContentSource, PageQueryBuilder, SanityClient};
use crate::config::SiteConfig;
use crate::i18n::{resolve_slug, Languages, ResolvedSlug, SlugError};
use crate::observability::metrics;
use crate::page::document::PageDocument;
use crate::page::fetch::fetch_page;
use crate::page::metadata::{DefaultMetadataProcessor, MetadataProcessor, PageMetadata};
use crate::page::render::{HtmlModuleRenderer, ModuleRenderer};

/// Why a page could not be produced.
#[derive(Debug, Error)]
pub enum PageError {
    /// No document matches the route. Terminal for the request.
    #[error("page not found")]
    NotFound,

    /// The content backend failed; propagated without retry.
    #[error(transparent)]
    Backend(#[from] CmsError),

    /// The backend answered with something that is not a page document.
    #[error("page document could not be decoded: {0}")]
    Document(#[source] serde_json::Error),
}

impl From<SlugError> for PageError {
    fn from(err: SlugError) -> Self {
        match err {
            SlugError::Empty => PageError::NotFound,
        }
    }
}

impl PageError {
    fn outcome(&self) -> &'static str {
        match self {
            PageError::NotFound => "not_found",
            PageError::Backend(_) | PageError::Document(_) => "error",
        }
    }
}

/// A rendered page body together with the resolved route.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub resolved: ResolvedSlug,
    pub html: String,
}

/// Everything one page route needs, built from a `SiteConfig`.
#[derive(Clone)]
pub struct PageService {
    source: Arc<dyn ContentSource>,
    languages: Languages,
    queries: PageQueryBuilder,
    renderer: Arc<dyn ModuleRenderer>,
    metadata: Arc<dyn MetadataProcessor>,
}

impl PageService {
    pub fn new(
        source: Arc<dyn ContentSource>,
        languages: Languages,
        queries: PageQueryBuilder,
        renderer: Arc<dyn ModuleRenderer>,
        metadata: Arc<dyn MetadataProcessor>,
    ) -> Self {
        Self {
            source,
            languages,
            queries,
            renderer,
            metadata,
        }
    }

    /// Build the service with the HTTP content client and built-in delegates.
    pub fn from_config(config: &SiteConfig) -> Result<Self, CmsError> {
        let client = SanityClient::new(config.cms.clone())?;
        Ok(Self::with_source(config, Arc::new(client)))
    }

    /// Build the service around an existing content source.
    pub fn with_source(config: &SiteConfig, source: Arc<dyn ContentSource>) -> Self {
        let languages = Languages::from_config(&config.i18n);
        let metadata = DefaultMetadataProcessor::new(config.site.clone(), languages.clone());
        Self::new(
            source,
            languages,
            PageQueryBuilder::new(config.query.clone()),
            Arc::new(HtmlModuleRenderer),
            Arc::new(metadata),
        )
    }

    pub fn queries(&self) -> &PageQueryBuilder {
        &self.queries
    }

    /// Resolve route segments without fetching anything.
    pub fn resolve<S: AsRef<str>>(&self, segments: &[S]) -> Result<ResolvedSlug, SlugError> {
        resolve_slug(segments, &self.languages)
    }

    /// Resolve and fetch. `Ok(None)` when no page matches.
    pub async fn fetch<S: AsRef<str>>(
        &self,
        segments: &[S],
    ) -> Result<(ResolvedSlug, Option<PageDocument>), PageError> {
        let resolved = self.resolve(segments)?;
        let document = fetch_page(self.source.as_ref(), &self.queries, &resolved).await?;
        Ok((resolved, document))
    }

    /// Resolve, fetch, and require a document.
    async fn get_page<S: AsRef<str>>(
        &self,
        segments: &[S],
    ) -> Result<(ResolvedSlug, PageDocument), PageError> {
        match self.fetch(segments).await? {
            (resolved, Some(document)) => Ok((resolved, document)),
            (resolved, None) => {
                tracing::info!(slug = %resolved.slug, lang = ?resolved.lang, "Page not found");
                Err(PageError::NotFound)
            }
        }
    }

    /// Page body: the document's modules through the module renderer.
    pub async fn render_page<S: AsRef<str>>(&self, segments: &[S]) -> Result<RenderedPage, PageError> {
        let result = self.get_page(segments).await.map(|(resolved, document)| RenderedPage {
            html: self.renderer.render(&document.modules, &document),
            resolved,
        });
        record("render", &result);
        result
    }

    /// Page `<head>` data: the document through the metadata processor.
    pub async fn generate_metadata<S: AsRef<str>>(&self, segments: &[S]) -> Result<PageMetadata, PageError> {
        let result = self
            .get_page(segments)
            .await
            .map(|(_, document)| self.metadata.process(&document));
        record("metadata", &result);
        result
    }
}

fn record<T>(entry: &'static str, result: &Result<T, PageError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.outcome(),
    };
    metrics::record_page_request(entry, outcome);
}

impl std::fmt::Debug for PageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageService")
            .field("languages", &self.languages)
            .finish_non_exhaustive()
    }
}
