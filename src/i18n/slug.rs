//! Slug and language resolution for catch-all page routes.

use serde::Serialize;
use thiserror::Error;

use crate::i18n::Languages;

/// A route resolved to a content slug and an optional language filter.
///
/// `slug` never starts with the resolved language segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSlug {
    pub slug: String,
    pub lang: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugError {
    #[error("route has no path segments")]
    Empty,
}

/// Resolve route segments into a slug and language.
///
/// Only the first segment is checked against `languages`. When it matches,
/// one leading `"<lang>/"` is removed from the joined slug.
pub fn resolve_slug<S: AsRef<str>>(
    segments: &[S],
    languages: &Languages,
) -> Result<ResolvedSlug, SlugError> {
    let first = segments.first().ok_or(SlugError::Empty)?;
    let lang = languages.get(first.as_ref()).map(str::to_owned);

    let joined = segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<&str>>()
        .join("/");

    let slug = match &lang {
        Some(lang) => {
            let prefix = format!("{lang}/");
            joined.strip_prefix(&prefix).map(str::to_owned).unwrap_or(joined)
        }
        None => joined,
    };

    Ok(ResolvedSlug { slug, lang })
}

/// Split a request path into route segments, dropping empty ones.
pub fn path_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn languages() -> Languages {
        Languages::new(["en", "fr"], "en")
    }

    fn resolved(slug: &str, lang: Option<&str>) -> ResolvedSlug {
        ResolvedSlug {
            slug: slug.to_string(),
            lang: lang.map(str::to_string),
        }
    }

    #[test]
    fn test_language_prefix_is_stripped() {
        let result = resolve_slug(&["fr", "blog", "post-1"], &languages()).unwrap();
        assert_eq!(result, resolved("blog/post-1", Some("fr")));
    }

    #[test]
    fn test_no_language_prefix() {
        let result = resolve_slug(&["blog", "post-1"], &languages()).unwrap();
        assert_eq!(result, resolved("blog/post-1", None));
    }

    #[test]
    fn test_only_first_segment_is_a_language() {
        let result = resolve_slug(&["en", "en", "about"], &languages()).unwrap();
        assert_eq!(result, resolved("en/about", Some("en")));

        let result = resolve_slug(&["blog", "fr", "post"], &languages()).unwrap();
        assert_eq!(result, resolved("blog/fr/post", None));
    }

    #[test]
    fn test_resolving_a_stripped_slug_again_is_stable() {
        let first = resolve_slug(&["fr", "docs", "intro"], &languages()).unwrap();
        let segments = path_segments(&first.slug);
        let second = resolve_slug(&segments, &languages()).unwrap();
        assert_eq!(second.slug, first.slug);
        assert_eq!(second.lang, None);
    }

    #[test]
    fn test_language_code_must_be_whole_segment() {
        let result = resolve_slug(&["french-fries"], &languages()).unwrap();
        assert_eq!(result, resolved("french-fries", None));

        let result = resolve_slug(&["enterprise", "pricing"], &languages()).unwrap();
        assert_eq!(result, resolved("enterprise/pricing", None));
    }

    #[test]
    fn test_lone_language_segment_keeps_slug() {
        let result = resolve_slug(&["fr"], &languages()).unwrap();
        assert_eq!(result, resolved("fr", Some("fr")));
    }

    #[test]
    fn test_empty_segments_rejected() {
        let segments: [&str; 0] = [];
        assert_eq!(resolve_slug(&segments, &languages()), Err(SlugError::Empty));
    }

    #[test]
    fn test_path_segments() {
        assert_eq!(path_segments("/fr/blog/"), vec!["fr", "blog"]);
        assert_eq!(path_segments("a//b"), vec!["a", "b"]);
        assert!(path_segments("/").is_empty());
    }
}
