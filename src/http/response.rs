//! Response helpers shared by the middleware and handlers.
//!
//! # Responsibilities
//! - Build the locale cookie (`SameSite=Lax`, 30-day max-age)
//! - Build locale redirects
//! - Strip hop-by-hop headers from forwarded messages

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Response, StatusCode};

use crate::config::LocaleConfig;
use crate::locale::Locale;

/// Connection-scoped headers that must not be forwarded.
pub const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Locale cookie settings.
#[derive(Debug, Clone)]
pub struct LocaleCookie {
    name: String,
    max_age_secs: u64,
}

impl LocaleCookie {
    pub fn new(config: &LocaleConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            max_age_secs: config.cookie_max_age_secs,
        }
    }

    /// `Set-Cookie` value for `locale`, or None if the configured name is not a valid header token.
    pub fn header_value(&self, locale: Locale) -> Option<HeaderValue> {
        let cookie = format!(
            "{}={}; Path=/; Max-Age={}; SameSite=Lax",
            self.name,
            locale.code(),
            self.max_age_secs
        );
        match HeaderValue::from_str(&cookie) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(cookie = %self.name, error = %e, "Invalid locale cookie");
                None
            }
        }
    }

    /// Append the cookie without clobbering other `Set-Cookie` headers.
    pub fn apply(&self, headers: &mut HeaderMap, locale: Locale) {
        if let Some(value) = self.header_value(locale) {
            headers.append(header::SET_COOKIE, value);
        }
    }
}

/// `307 Temporary Redirect` to `location`.
pub fn temporary_redirect(location: &str) -> Response<Body> {
    let mut response = Response::new(Body::empty());
    match HeaderValue::from_str(location) {
        Ok(value) => {
            *response.status_mut() = StatusCode::TEMPORARY_REDIRECT;
            response.headers_mut().insert(header::LOCATION, value);
        }
        Err(_) => {
            tracing::warn!(location = %location, "Redirect target is not a valid header value");
            *response.status_mut() = StatusCode::BAD_REQUEST;
        }
    }
    response
}

/// Remove hop-by-hop headers in place.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value() {
        let cookie = LocaleCookie::new(&LocaleConfig::default());
        assert_eq!(
            cookie.header_value(Locale::En).unwrap(),
            "locale=en; Path=/; Max-Age=2592000; SameSite=Lax"
        );
    }

    #[test]
    fn test_invalid_cookie_name() {
        let mut config = LocaleConfig::default();
        config.cookie_name = "bad\nname".into();
        assert!(LocaleCookie::new(&config).header_value(Locale::Es).is_none());
    }

    #[test]
    fn test_apply_appends() {
        let cookie = LocaleCookie::new(&LocaleConfig::default());
        let mut headers = HeaderMap::new();
        headers.insert(header::SET_COOKIE, HeaderValue::from_static("session=1"));
        cookie.apply(&mut headers, Locale::Es);
        assert_eq!(headers.get_all(header::SET_COOKIE).iter().count(), 2);
    }

    #[test]
    fn test_temporary_redirect() {
        let response = temporary_redirect("/es/mapa?x=1");
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/es/mapa?x=1");
    }

    #[test]
    fn test_strip_hop_by_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("connection", HeaderValue::from_static("keep-alive"));
        headers.insert("accept", HeaderValue::from_static("text/html"));
        strip_hop_by_hop(&mut headers);
        assert!(headers.get("connection").is_none());
        assert!(headers.get("accept").is_some());
    }
}
