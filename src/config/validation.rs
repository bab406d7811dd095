//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Base URL must be an absolute http(s) URL
//! - Value ranges (windows, limits, timeouts > 0)
//! - Excluded prefixes must be absolute paths
//! - Cookie name must be an RFC 6265 token
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: EdgeConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::EdgeConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("site.base_url '{0}' is not an absolute http(s) URL")]
    InvalidBaseUrl(String),

    #[error("listener.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("{0} must be greater than zero")]
    MustBePositive(&'static str),

    #[error("locale.cookie_name '{0}' is not a valid cookie name token")]
    InvalidCookieName(String),

    #[error("locale.excluded_prefixes entry '{0}' must start with '/'")]
    RelativePrefix(String),

    #[error("robots rule has an empty user_agent")]
    EmptyUserAgent,

    #[error("contact.admin_api_key must not be empty when set")]
    EmptyAdminKey,
}

/// Whether `name` is a cookie-name token: visible ASCII, no separators.
pub fn is_cookie_token(name: &str) -> bool {
    const SEPARATORS: &[u8] = b"()<>@,;:\\\"/[]?={} \t";
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_graphic() && !SEPARATORS.contains(&b))
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.site.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
        _ => errors.push(ValidationError::InvalidBaseUrl(config.site.base_url.clone())),
    }

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(config.listener.bind_address.clone()));
    }

    if config.rate_limit.window_ms == 0 {
        errors.push(ValidationError::MustBePositive("rate_limit.window_ms"));
    }
    if config.rate_limit.max_requests == 0 {
        errors.push(ValidationError::MustBePositive("rate_limit.max_requests"));
    }
    if config.rate_limit.sweep_interval_secs == 0 {
        errors.push(ValidationError::MustBePositive("rate_limit.sweep_interval_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::MustBePositive("timeouts.request_secs"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::MustBePositive("timeouts.upstream_secs"));
    }

    if config.contact.queue_capacity == 0 {
        errors.push(ValidationError::MustBePositive("contact.queue_capacity"));
    }

    if !is_cookie_token(&config.locale.cookie_name) {
        errors.push(ValidationError::InvalidCookieName(config.locale.cookie_name.clone()));
    }

    for prefix in &config.locale.excluded_prefixes {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::RelativePrefix(prefix.clone()));
        }
    }

    if config.robots.rules.iter().any(|r| r.user_agent.trim().is_empty()) {
        errors.push(ValidationError::EmptyUserAgent);
    }

    if config.contact.admin_api_key.as_deref().is_some_and(|key| key.trim().is_empty()) {
        errors.push(ValidationError::EmptyAdminKey);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&EdgeConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = EdgeConfig::default();
        config.site.base_url = "tepoztlan.example".into();
        config.rate_limit.max_requests = 0;
        config.locale.excluded_prefixes.push("api".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidBaseUrl("tepoztlan.example".into()),
                ValidationError::MustBePositive("rate_limit.max_requests"),
                ValidationError::RelativePrefix("api".into()),
            ]
        );
    }

    #[test]
    fn test_cookie_name_must_be_token() {
        for bad in ["", "a;b", "bad name", "tab\tname", "quote\"d", "ñame", "k=v"] {
            let mut config = EdgeConfig::default();
            config.locale.cookie_name = bad.into();
            assert_eq!(
                validate_config(&config),
                Err(vec![ValidationError::InvalidCookieName(bad.into())]),
                "{bad:?}"
            );
        }

        for good in ["locale", "site_lang", "__Host-locale", "lang.v2"] {
            assert!(is_cookie_token(good), "{good}");
        }
    }

    #[test]
    fn test_contact_queue_settings() {
        let mut config = EdgeConfig::default();
        config.contact.queue_capacity = 0;
        config.contact.admin_api_key = Some("  ".into());
        assert_eq!(
            validate_config(&config),
            Err(vec![
                ValidationError::MustBePositive("contact.queue_capacity"),
                ValidationError::EmptyAdminKey,
            ])
        );
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let mut config = EdgeConfig::default();
        config.site.base_url = "ftp://tepoztlan.example".into();
        assert!(validate_config(&config).is_err());
    }
}
