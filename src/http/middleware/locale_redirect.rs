//! Locale redirect middleware.
//!
//! Every non-excluded request either already starts with `/es` or `/en`
//! (pass through, refresh the cookie) or is redirected once to a
//! locale-prefixed path chosen by the detector.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::config::LocaleConfig;
use crate::http::response::{temporary_redirect, LocaleCookie};
use crate::locale::{Locale, LocaleDetector};
use crate::observability::metrics;
use crate::routing::{split_locale_prefix, AnyMatcher, Matcher};

/// State required for locale redirects.
#[derive(Debug, Clone)]
pub struct LocaleRedirectState {
    pub detector: Arc<LocaleDetector>,
    pub exclusions: Arc<AnyMatcher>,
    pub cookie: LocaleCookie,
}

impl LocaleRedirectState {
    pub fn new(config: &LocaleConfig) -> Self {
        Self {
            detector: Arc::new(LocaleDetector::new(config)),
            exclusions: Arc::new(AnyMatcher::exclusions(config.excluded_prefixes.iter().cloned())),
            cookie: LocaleCookie::new(config),
        }
    }
}

/// `/{locale}{path}` (or `/{locale}` for the root), keeping the query string.
pub fn redirect_target(locale: Locale, path: &str, query: Option<&str>) -> String {
    let mut target = format!("/{}", locale.code());
    if path != "/" {
        target.push_str(path);
    }
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        target.push('?');
        target.push_str(query);
    }
    target
}

pub async fn locale_redirect_middleware(
    State(state): State<LocaleRedirectState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if state.exclusions.matches(&path) {
        return next.run(request).await;
    }

    if let Some((locale, _)) = split_locale_prefix(&path) {
        request.extensions_mut().insert(locale);
        let mut response = next.run(request).await;
        state.cookie.apply(response.headers_mut(), locale);
        return response;
    }

    let ctx = state.detector.detect(request.headers());
    let target = redirect_target(ctx.locale, &path, request.uri().query());

    tracing::debug!(
        path = %path,
        target = %target,
        locale = %ctx.locale,
        source = ctx.source.as_str(),
        "Redirecting to locale-prefixed path"
    );
    metrics::record_locale_redirect(ctx.locale.code(), ctx.source.as_str());

    let mut response = temporary_redirect(&target);
    state.cookie.apply(response.headers_mut(), ctx.locale);
    response
}
