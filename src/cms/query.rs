//! GROQ query composition for page lookups.
//!
//! The query text is assembled from operator-owned fragments in
//! [`QueryConfig`]. Everything derived from the request (slug, language)
//! and the `global-module` path selectors travel as bound parameters.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::config::QueryConfig;
use crate::i18n::ResolvedSlug;

/// A GROQ query plus its bound parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroqQuery {
    pub query: String,
    pub params: BTreeMap<String, Value>,
}

impl GroqQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: BTreeMap::new(),
        }
    }

    /// Bind `$name` to `value`.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// One source of modules in a page's module list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleGroup {
    GlobalBefore,
    PathBefore,
    Page,
    PathAfter,
    GlobalAfter,
}

/// Render order of module groups. The page's module list is the
/// concatenation of these groups, in exactly this order.
pub const MODULE_GROUPS: [ModuleGroup; 5] = [
    ModuleGroup::GlobalBefore,
    ModuleGroup::PathBefore,
    ModuleGroup::Page,
    ModuleGroup::PathAfter,
    ModuleGroup::GlobalAfter,
];

impl ModuleGroup {
    /// GROQ expression selecting this group's module array.
    fn source(&self) -> &'static str {
        match self {
            ModuleGroup::GlobalBefore => "*[_type == 'global-module' && path == $globalPath].before[]",
            ModuleGroup::PathBefore => "*[_type == 'global-module' && path == $pagePath].before[]",
            ModuleGroup::Page => "modules[]",
            ModuleGroup::PathAfter => "*[_type == 'global-module' && path == $pagePath].after[]",
            ModuleGroup::GlobalAfter => "*[_type == 'global-module' && path == $globalPath].after[]",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModuleGroup::GlobalBefore => "global modules (before)",
            ModuleGroup::PathBefore => "path modules (before)",
            ModuleGroup::Page => "page modules",
            ModuleGroup::PathAfter => "path modules (after)",
            ModuleGroup::GlobalAfter => "global modules (after)",
        }
    }
}

/// Builds the single query that loads a page and its ordered modules.
#[derive(Debug, Clone)]
pub struct PageQueryBuilder {
    config: QueryConfig,
}

impl PageQueryBuilder {
    pub fn new(config: QueryConfig) -> Self {
        Self { config }
    }

    /// Compose the page query for a resolved route.
    ///
    /// The `language == $lang` clause is present only when a language was
    /// resolved, and `$lang` is bound only in that case.
    pub fn build(&self, resolved: &ResolvedSlug) -> GroqQuery {
        let language_filter = if resolved.lang.is_some() {
            "\n\t&& language == $lang"
        } else {
            ""
        };

        let text = format!(
            "*[\n\
             \t_type == 'page'\n\
             \t&& metadata.slug.current == $slug{language_filter}\n\
             ][0]{{\n\
             \t...,\n\
             \tbody[]{{\n\
             \t\t...,\n\
             \t\t_type == 'image' => {{\n\
             \t\t\t{image},\n\
             \t\t\tasset->\n\
             \t\t}}\n\
             \t}},\n\
             \tmetadata {{\n\
             \t\t...,\n\
             \t\t'ogimage': image.asset->url + '?w={width}'\n\
             \t}},\n\
             \t'modules': (\n{modules}\n\t),\n\
             \t{translations},\n\
             }}",
            image = self.config.image_projection,
            width = self.config.og_image_width,
            modules = self.modules_expression(),
            translations = self.config.translations_projection,
        );

        let mut query = GroqQuery::new(text)
            .param("slug", resolved.slug.clone())
            .param("globalPath", self.config.global_path.clone())
            .param("pagePath", self.config.page_path.clone());
        if let Some(lang) = &resolved.lang {
            query = query.param("lang", lang.clone());
        }
        query
    }

    /// The `+`-joined module groups, in render order.
    fn modules_expression(&self) -> String {
        MODULE_GROUPS
            .iter()
            .enumerate()
            .map(|(i, group)| {
                let join = if i == 0 { "" } else { "+ " };
                format!(
                    "\t\t// {}\n\t\t{join}{}{{ {} }}",
                    group.label(),
                    group.source(),
                    self.config.modules_projection
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> PageQueryBuilder {
        PageQueryBuilder::new(QueryConfig::default())
    }

    fn resolved(slug: &str, lang: Option<&str>) -> ResolvedSlug {
        ResolvedSlug {
            slug: slug.to_string(),
            lang: lang.map(str::to_string),
        }
    }

    #[test]
    fn test_language_filter_only_when_resolved() {
        let with_lang = builder().build(&resolved("blog/post-1", Some("fr")));
        assert!(with_lang.query.contains("&& language == $lang"));
        assert_eq!(with_lang.params.get("lang"), Some(&Value::from("fr")));

        let without = builder().build(&resolved("blog/post-1", None));
        assert!(!without.query.contains("language == $lang"));
        assert!(!without.params.contains_key("lang"));
    }

    #[test]
    fn test_slug_is_bound_not_interpolated() {
        let hostile = "x' || true || 'y";
        let query = builder().build(&resolved(hostile, None));
        assert!(!query.query.contains(hostile));
        assert_eq!(query.params.get("slug"), Some(&Value::from(hostile)));
        assert!(query.query.contains("metadata.slug.current == $slug"));
    }

    #[test]
    fn test_module_groups_in_render_order() {
        let query = builder().build(&resolved("about", None)).query;
        let positions: Vec<usize> = MODULE_GROUPS
            .iter()
            .map(|group| query.find(group.source()).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
        assert_eq!(query.matches("\t\t+ ").count(), MODULE_GROUPS.len() - 1);
    }

    #[test]
    fn test_og_image_width() {
        let mut config = QueryConfig::default();
        config.og_image_width = 800;
        let query = PageQueryBuilder::new(config).build(&resolved("about", None));
        assert!(query.query.contains("'ogimage': image.asset->url + '?w=800'"));
    }

    #[test]
    fn test_path_selectors_are_parameters() {
        let query = builder().build(&resolved("about", None));
        assert_eq!(query.params.get("globalPath"), Some(&Value::from("*")));
        assert_eq!(query.params.get("pagePath"), Some(&Value::from("/")));
    }
}
