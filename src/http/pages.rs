//! Page pass-through.
//!
//! Locale-prefixed page requests go to the upstream renderer. Without one the
//! edge answers with a JSON descriptor of the resolved page. Either way the
//! response advertises its alternates in a `Link` header.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::http::server::AppState;
use crate::locale::Locale;
use crate::routing::split_locale_prefix;
use crate::seo::{link_header, Alternate};

/// What the edge resolved for a page when no renderer is configured.
#[derive(Debug, Serialize)]
pub struct PageDescriptor {
    pub locale: Locale,
    pub path: String,
    pub canonical: String,
    pub alternates: Vec<Alternate>,
}

pub async fn page_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let path = request.uri().path().to_string();
    let prefix = split_locale_prefix(&path).map(|(locale, _)| locale);

    let mut response = match (&state.upstream, prefix) {
        (Some(upstream), _) => upstream.forward(request).await,
        (None, Some(locale)) => Json(PageDescriptor {
            locale,
            path: path.clone(),
            canonical: state.urls.href(&path, locale),
            alternates: state.urls.alternates(&path),
        })
        .into_response(),
        (None, None) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    };

    if prefix.is_some() && response.status().is_success() {
        let link = link_header(&state.urls.alternates(&path));
        match HeaderValue::from_str(&link) {
            Ok(value) => {
                response.headers_mut().append(header::LINK, value);
            }
            Err(e) => tracing::warn!(path = %path, error = %e, "Skipping Link header"),
        }
    }

    response
}
