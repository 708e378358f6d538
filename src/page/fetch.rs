//! Page lookup through the content backend.

use crate::cms::{ContentSource, PageQueryBuilder};
use crate::i18n::ResolvedSlug;
use crate::page::dispatch::PageError;
use crate::page::document::PageDocument;

/// Run the page query for `resolved`.
///
/// `Ok(None)` means no page matches the slug (and language, if any).
/// Backend failures are returned as-is, without retry.
pub async fn fetch_page(
    source: &dyn ContentSource,
    queries: &PageQueryBuilder,
    resolved: &ResolvedSlug,
) -> Result<Option<PageDocument>, PageError> {
    let query = queries.build(resolved);
    let value = source.query(&query).await?;

    if value.is_null() {
        tracing::debug!(slug = %resolved.slug, lang = ?resolved.lang, "No page document");
        return Ok(None);
    }

    let document: PageDocument = serde_json::from_value(value).map_err(PageError::Document)?;
    tracing::debug!(
        slug = %resolved.slug,
        lang = ?resolved.lang,
        id = %document.id,
        modules = document.modules.len(),
        "Page document fetched"
    );
    Ok(Some(document))
}
