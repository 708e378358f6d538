//! Page metadata derivation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::SiteMetaConfig;
use crate::i18n::Languages;
use crate::page::document::PageDocument;

/// Everything the document `<head>` needs for a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: Option<String>,
    pub canonical: String,
    pub og_image: Option<String>,
    /// `false` renders `robots: noindex`.
    pub index: bool,
    /// Language of the page, used for `<html lang>`.
    pub lang: String,
    /// Language code → URL of the same page in that language.
    pub alternates: BTreeMap<String, String>,
}

/// Derives page metadata from a fetched document.
pub trait MetadataProcessor: Send + Sync {
    fn process(&self, document: &PageDocument) -> PageMetadata;
}

/// Canonical URLs from the site base URL, title suffix from config.
#[derive(Debug, Clone)]
pub struct DefaultMetadataProcessor {
    site: SiteMetaConfig,
    languages: Languages,
}

impl DefaultMetadataProcessor {
    pub fn new(site: SiteMetaConfig, languages: Languages) -> Self {
        Self { site, languages }
    }

    /// Public URL of `slug` in `lang`.
    ///
    /// The default language has no prefix and `index` is the site root.
    pub fn page_url(&self, slug: Option<&str>, lang: Option<&str>) -> String {
        let base = self.site.base_url.trim_end_matches('/');
        let mut path = String::new();
        if let Some(lang) = lang.filter(|l| *l != self.languages.default_language()) {
            path.push('/');
            path.push_str(lang);
        }
        if let Some(slug) = slug.filter(|s| !s.is_empty() && *s != "index") {
            path.push('/');
            path.push_str(slug);
        }
        if path.is_empty() {
            path.push('/');
        }
        format!("{base}{path}")
    }
}

impl MetadataProcessor for DefaultMetadataProcessor {
    fn process(&self, document: &PageDocument) -> PageMetadata {
        let meta = &document.metadata;
        let lang = document
            .language
            .clone()
            .unwrap_or_else(|| self.languages.default_language().to_string());

        let base_title = meta
            .title
            .clone()
            .or_else(|| document.extra.get("title").and_then(|t| t.as_str()).map(str::to_owned))
            .unwrap_or_default();

        let alternates = document
            .translations
            .iter()
            .filter_map(|t| {
                let language = t.language.as_deref()?;
                Some((language.to_string(), self.page_url(t.slug.as_deref(), Some(language))))
            })
            .collect();

        PageMetadata {
            title: format!("{base_title}{}", self.site.title_suffix),
            description: meta.description.clone(),
            canonical: self.page_url(document.slug(), Some(lang.as_str())),
            og_image: meta.ogimage.clone(),
            index: !meta.no_index,
            lang,
            alternates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn processor() -> DefaultMetadataProcessor {
        DefaultMetadataProcessor::new(
            SiteMetaConfig {
                base_url: "https://example.com/".to_string(),
                title_suffix: " | Example".to_string(),
            },
            Languages::new(["en", "fr"], "en"),
        )
    }

    fn document(value: serde_json::Value) -> PageDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_page_urls() {
        let p = processor();
        assert_eq!(p.page_url(Some("index"), Some("en")), "https://example.com/");
        assert_eq!(p.page_url(Some("about"), Some("en")), "https://example.com/about");
        assert_eq!(p.page_url(Some("about"), Some("fr")), "https://example.com/fr/about");
        assert_eq!(p.page_url(Some("index"), Some("fr")), "https://example.com/fr");
        assert_eq!(p.page_url(None, None), "https://example.com/");
    }

    #[test]
    fn test_process_document() {
        let doc = document(json!({
            "_id": "p1",
            "language": "fr",
            "metadata": {
                "slug": { "current": "blog/post-1" },
                "title": "Bonjour",
                "description": "Un article",
                "ogimage": "https://cdn.example/og.png?w=1200",
                "noIndex": true
            },
            "translations": [
                { "slug": "blog/post-1", "language": "en" },
                { "slug": "blog/post-1", "language": "fr" },
                { "slug": "orphan" }
            ]
        }));

        let meta = processor().process(&doc);
        assert_eq!(meta.title, "Bonjour | Example");
        assert_eq!(meta.description.as_deref(), Some("Un article"));
        assert_eq!(meta.canonical, "https://example.com/fr/blog/post-1");
        assert_eq!(meta.og_image.as_deref(), Some("https://cdn.example/og.png?w=1200"));
        assert!(!meta.index);
        assert_eq!(meta.lang, "fr");
        assert_eq!(meta.alternates.len(), 2);
        assert_eq!(meta.alternates["en"], "https://example.com/blog/post-1");
    }

    #[test]
    fn test_missing_metadata_defaults() {
        let doc = document(json!({ "_id": "p2", "title": "Fallback" }));
        let meta = processor().process(&doc);
        assert_eq!(meta.title, "Fallback | Example");
        assert_eq!(meta.lang, "en");
        assert!(meta.index);
        assert_eq!(meta.canonical, "https://example.com/");
    }
}
