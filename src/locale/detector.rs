//! Locale detection for un-prefixed requests.
//!
//! # Responsibilities
//! - Read the locale cookie
//! - Parse `Accept-Language`
//! - Fall back to the timezone hint, then the configured default

use axum::http::{header, HeaderMap};
use serde::Serialize;

use crate::config::LocaleConfig;
use crate::locale::Locale;

/// Where the detected locale came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocaleSource {
    Cookie,
    Header,
    Default,
}

impl LocaleSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocaleSource::Cookie => "cookie",
            LocaleSource::Header => "header",
            LocaleSource::Default => "default",
        }
    }
}

/// Per-request locale decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocaleContext {
    pub locale: Locale,
    pub source: LocaleSource,
}

/// Picks a locale from request cookies and headers.
#[derive(Debug, Clone)]
pub struct LocaleDetector {
    cookie_name: String,
    timezone_header: String,
    default_locale: Locale,
}

impl LocaleDetector {
    pub fn new(config: &LocaleConfig) -> Self {
        Self {
            cookie_name: config.cookie_name.clone(),
            timezone_header: config.timezone_header.to_ascii_lowercase(),
            default_locale: config.default_locale,
        }
    }

    /// Name of the cookie this detector reads.
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Run the priority chain. First match wins; never fails.
    pub fn detect(&self, headers: &HeaderMap) -> LocaleContext {
        if let Some(locale) = self.from_cookie(headers) {
            return LocaleContext { locale, source: LocaleSource::Cookie };
        }

        if let Some(locale) = headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_accept_language)
        {
            return LocaleContext { locale, source: LocaleSource::Header };
        }

        let mexico_hint = headers
            .get(self.timezone_header.as_str())
            .and_then(|v| v.to_str().ok())
            .map(|tz| tz.contains("Mexico"))
            .unwrap_or(false);
        if mexico_hint {
            return LocaleContext { locale: Locale::Es, source: LocaleSource::Header };
        }

        LocaleContext { locale: self.default_locale, source: LocaleSource::Default }
    }

    fn from_cookie(&self, headers: &HeaderMap) -> Option<Locale> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .filter(|(name, _)| *name == self.cookie_name)
            .find_map(|(_, value)| value.trim().parse().ok())
    }
}

/// First language range that starts with a supported code, ignoring q-weights.
pub fn parse_accept_language(value: &str) -> Option<Locale> {
    value
        .split(',')
        .map(|range| range.split(';').next().unwrap_or_default().trim().to_lowercase())
        .find_map(|tag| {
            Locale::ALL
                .into_iter()
                .find(|locale| tag.starts_with(locale.code()))
        })
}
