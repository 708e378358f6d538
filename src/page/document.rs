//! Page document types as returned by the page query.
//!
//! Only the fields this service reads are named. Everything else is kept
//! in `extra` so renderers see the document as the backend sent it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A `page` document with its resolved module list.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PageDocument {
    #[serde(rename = "_id", default)]
    pub id: String,

    #[serde(default)]
    pub language: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: DocumentMetadata,

    /// Ordered module list: global before, path before, page, path after, global after.
    #[serde(default, deserialize_with = "lenient_list")]
    pub modules: Vec<Module>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub translations: Vec<Translation>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PageDocument {
    /// The document's slug, if it has one.
    pub fn slug(&self) -> Option<&str> {
        self.metadata.slug.as_ref().map(|s| s.current.as_str())
    }
}

/// The `metadata` object of a page.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    #[serde(default)]
    pub slug: Option<Slug>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Open Graph image URL with the width parameter already applied.
    #[serde(default)]
    pub ogimage: Option<String>,

    #[serde(default)]
    pub no_index: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Slug {
    pub current: String,
}

/// One renderable module. `_type` selects the component.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Module {
    #[serde(rename = "_type")]
    pub kind: String,

    #[serde(rename = "_key", default)]
    pub key: Option<String>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Module {
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// A link to the same page in another language.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Translation {
    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub language: Option<String>,
}

/// GROQ yields `null` for missing fields and for `array + null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A list whose `null` or malformed entries are dropped.
///
/// Dereferencing a deleted document or an empty `global-module` group
/// leaves `null` holes in GROQ arrays; one bad entry must not sink the page.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .enumerate()
        .filter(|(_, entry)| !entry.is_null())
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping malformed list entry");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_page() {
        let doc: PageDocument = serde_json::from_value(json!({
            "_id": "page-about",
            "_type": "page",
            "language": "fr",
            "title": "About",
            "metadata": {
                "slug": { "current": "about" },
                "title": "About us",
                "ogimage": "https://cdn.example/about.png?w=1200",
                "noIndex": true
            },
            "modules": [
                { "_type": "hero", "_key": "a1", "title": "Hello" },
                { "_type": "footer" }
            ],
            "translations": [{ "slug": "about", "language": "en" }]
        }))
        .unwrap();

        assert_eq!(doc.id, "page-about");
        assert_eq!(doc.slug(), Some("about"));
        assert!(doc.metadata.no_index);
        assert_eq!(doc.modules.len(), 2);
        assert_eq!(doc.modules[0].kind, "hero");
        assert_eq!(doc.modules[0].str_field("title"), Some("Hello"));
        assert_eq!(doc.modules[1].key, None);
        assert_eq!(doc.extra.get("title"), Some(&json!("About")));
    }

    #[test]
    fn test_nulls_become_empty() {
        let doc: PageDocument = serde_json::from_value(json!({
            "_id": "p",
            "metadata": null,
            "modules": null,
            "translations": null
        }))
        .unwrap();

        assert!(doc.modules.is_empty());
        assert!(doc.translations.is_empty());
        assert_eq!(doc.slug(), None);
    }

    #[test]
    fn test_null_and_malformed_entries_are_skipped() {
        let doc: PageDocument = serde_json::from_value(json!({
            "_id": "p",
            "modules": [
                null,
                { "_type": "hero", "_key": "h" },
                { "_key": "untyped" },
                "not a module",
                { "_type": "footer" }
            ],
            "translations": [
                null,
                { "slug": "about", "language": "en" },
                42
            ]
        }))
        .unwrap();

        let kinds: Vec<&str> = doc.modules.iter().map(|m| m.kind.as_str()).collect();
        assert_eq!(kinds, ["hero", "footer"]);
        assert_eq!(
            doc.translations,
            [Translation {
                slug: Some("about".to_string()),
                language: Some("en".to_string())
            }]
        );
    }
}
