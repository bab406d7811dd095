//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge
//! service. All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// Root configuration for the edge service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EdgeConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Public site settings (absolute URL base).
    pub site: SiteConfig,

    /// Locale detection, cookie and redirect settings.
    pub locale: LocaleConfig,

    /// Form-endpoint rate limiting.
    pub rate_limit: RateLimitConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Page renderer that locale-prefixed requests are forwarded to.
    pub upstream: UpstreamConfig,

    /// Business listing enumeration for the sitemap.
    pub listings: ListingsConfig,

    /// robots.txt rule groups.
    pub robots: RobotsConfig,

    /// Contact-form queue and moderation access.
    pub contact: ContactConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Public site settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Absolute base URL used in the sitemap, robots and hreflang output.
    /// Overridden by the `SITE_URL` environment variable.
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl SiteConfig {
    /// Base URL without a trailing slash.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Locale detection and redirect settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Locale used when nothing in the request names one.
    pub default_locale: Locale,

    /// Name of the cookie that remembers the visitor's locale.
    pub cookie_name: String,

    /// Cookie lifetime in seconds (30 days).
    pub cookie_max_age_secs: u64,

    /// Header carrying the visitor's IANA timezone.
    pub timezone_header: String,

    /// Path prefixes that bypass locale handling entirely.
    pub excluded_prefixes: Vec<String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default_locale: Locale::Es,
            cookie_name: "locale".to_string(),
            cookie_max_age_secs: 30 * 24 * 60 * 60,
            timezone_header: "x-timezone".to_string(),
            excluded_prefixes: [
                "/api",
                "/_next",
                "/static",
                "/assets",
                "/images",
                "/favicon.ico",
                "/robots.txt",
                "/sitemap.xml",
                "/metrics",
                "/health",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting on form endpoints.
    pub enabled: bool,

    /// Fixed window length in milliseconds.
    pub window_ms: u64,

    /// Requests allowed per client per window.
    pub max_requests: u32,

    /// How often expired windows are swept, in seconds.
    pub sweep_interval_secs: u64,

    /// Key clients by the first X-Forwarded-For entry instead of the peer IP.
    pub trust_forwarded_for: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_ms: 60_000,
            max_requests: 5,
            sweep_interval_secs: 60,
            trust_forwarded_for: false,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time for request/response in seconds.
    pub request_secs: u64,

    /// Upstream renderer response timeout in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_secs: 10,
        }
    }
}

/// Upstream page renderer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Renderer address (e.g., "127.0.0.1:3000"). Without one, pages are
    /// answered with a JSON descriptor.
    pub address: Option<String>,
}

/// Listing enumeration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ListingsConfig {
    /// JSON file of `{lang, category, slug, updated_at?}` records.
    pub path: Option<String>,
}

/// One robots.txt group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RobotsRule {
    pub user_agent: String,
    #[serde(default)]
    pub allow: Vec<String>,
    #[serde(default)]
    pub disallow: Vec<String>,
}

/// robots.txt configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RobotsConfig {
    pub rules: Vec<RobotsRule>,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            rules: vec![RobotsRule {
                user_agent: "*".to_string(),
                allow: vec!["/".to_string()],
                disallow: vec!["/api/".to_string(), "/admin/".to_string()],
            }],
        }
    }
}

/// Contact-form queue configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Submissions held before new ones are refused with 503.
    pub queue_capacity: usize,

    /// Bearer key for the moderation endpoint. The endpoint is not mounted
    /// without one.
    pub admin_api_key: Option<String>,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1000,
            admin_api_key: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) when RUST_LOG is unset.
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: EdgeConfig = toml::from_str(
            r#"
            [site]
            base_url = "https://tepoztlan.example/"

            [locale]
            default_locale = "en"
            "#,
        )
        .unwrap();

        assert_eq!(config.site.base(), "https://tepoztlan.example");
        assert_eq!(config.locale.default_locale, Locale::En);
        assert_eq!(config.locale.cookie_name, "locale");
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.robots.rules.len(), 1);
        assert_eq!(config.contact.queue_capacity, 1000);
        assert_eq!(config.contact.admin_api_key, None);
    }

    #[test]
    fn test_robots_rules_from_toml() {
        let config: EdgeConfig = toml::from_str(
            r#"
            [[robots.rules]]
            user_agent = "GPTBot"
            disallow = ["/"]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.robots.rules,
            vec![RobotsRule {
                user_agent: "GPTBot".into(),
                allow: vec![],
                disallow: vec!["/".into()],
            }]
        );
    }
}
