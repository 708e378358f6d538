//! The set of supported language codes.

use crate::config::I18nConfig;

/// Known language codes plus the default one.
///
/// Membership is exact: `fr-CA` is not `fr`, and codes are not case-folded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Languages {
    codes: Vec<String>,
    default: String,
}

impl Languages {
    /// Build a language set. The default is added to the set if missing.
    pub fn new<I, S>(codes: I, default: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let default = default.into();
        let mut codes: Vec<String> = codes.into_iter().map(Into::into).collect();
        if !codes.contains(&default) {
            codes.push(default.clone());
        }
        Self { codes, default }
    }

    pub fn from_config(config: &I18nConfig) -> Self {
        Self::new(config.languages.iter().cloned(), config.default_language.clone())
    }

    /// Return the stored code equal to `code`, if known. No normalization is applied.
    pub fn get(&self, code: &str) -> Option<&str> {
        self.codes.iter().find(|c| *c == code).map(String::as_str)
    }

    pub fn default_language(&self) -> &str {
        &self.default
    }
}
