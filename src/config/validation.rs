//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the language set is usable (non-empty, unique, default included)
//! - Validate value ranges (timeouts > 0, image width > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SiteConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::SiteConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("cms.{0} must not be empty")]
    EmptyField(&'static str),

    #[error("cms.api_version '{0}' must be '1' or a YYYY-MM-DD date")]
    ApiVersion(String),

    #[error("i18n.languages must list at least one language")]
    NoLanguages,

    #[error("i18n.languages contains '{0}' more than once")]
    DuplicateLanguage(String),

    #[error("i18n language code '{0}' must be lowercase letters and '-'")]
    InvalidLanguage(String),

    #[error("i18n.default_language '{0}' is not in i18n.languages")]
    UnknownDefaultLanguage(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.cms.api_host.is_none() && config.cms.project_id.trim().is_empty() {
        errors.push(ValidationError::EmptyField("project_id"));
    }
    if config.cms.dataset.trim().is_empty() {
        errors.push(ValidationError::EmptyField("dataset"));
    }
    if !is_api_version(&config.cms.api_version) {
        errors.push(ValidationError::ApiVersion(config.cms.api_version.clone()));
    }

    let languages = &config.i18n.languages;
    if languages.is_empty() {
        errors.push(ValidationError::NoLanguages);
    }
    let mut seen = HashSet::new();
    for lang in languages {
        if !is_language_code(lang) {
            errors.push(ValidationError::InvalidLanguage(lang.clone()));
        }
        if !seen.insert(lang.as_str()) {
            errors.push(ValidationError::DuplicateLanguage(lang.clone()));
        }
    }
    if !languages.contains(&config.i18n.default_language) {
        errors.push(ValidationError::UnknownDefaultLanguage(
            config.i18n.default_language.clone(),
        ));
    }

    if config.query.og_image_width == 0 {
        errors.push(ValidationError::Zero("query.og_image_width"));
    }
    if config.cms.timeout_secs == 0 {
        errors.push(ValidationError::Zero("cms.timeout_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_api_version(version: &str) -> bool {
    if version == "1" {
        return true;
    }
    let parts: Vec<&str> = version.split('-').collect();
    matches!(parts.as_slice(), [y, m, d]
        if y.len() == 4 && m.len() == 2 && d.len() == 2
            && parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())))
}

fn is_language_code(code: &str) -> bool {
    !code.is_empty()
        && !code.starts_with('-')
        && code.chars().all(|c| c.is_ascii_lowercase() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.cms.project_id = "abc123".to_string();
        config.i18n.languages = vec!["en".to_string(), "fr".to_string()];
        config
    }

    #[test]
    fn test_valid_config() {
        assert_eq!(validate_config(&valid_config()), Ok(()));
    }

    #[test]
    fn test_api_host_replaces_project_id() {
        let mut config = valid_config();
        config.cms.project_id = String::new();
        config.cms.api_host = Some("http://127.0.0.1:4000".to_string());
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_language_rules() {
        let mut config = valid_config();
        config.i18n.languages = vec!["en".to_string(), "en".to_string(), "FR".to_string()];
        config.i18n.default_language = "de".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateLanguage("en".to_string())));
        assert!(errors.contains(&ValidationError::InvalidLanguage("FR".to_string())));
        assert!(errors.contains(&ValidationError::UnknownDefaultLanguage("de".to_string())));
    }

    #[test]
    fn test_api_version_shapes() {
        assert!(is_api_version("1"));
        assert!(is_api_version("2024-10-01"));
        assert!(!is_api_version("v2024-10-01"));
        assert!(!is_api_version("2024-1-01"));
        assert!(!is_api_version("latest"));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = valid_config();
        config.observability.metrics_address = "not-an-address".to_string();
        assert_eq!(validate_config(&config), Ok(()));

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::MetricsAddress("not-an-address".to_string())]
        );
    }
}
