//! Sitemap, robots, hreflang and language-switcher endpoints.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::locale::Locale;
use crate::seo::{build_entries, link_tags, render_robots, render_xml, Alternate};

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct SwitchQuery {
    pub path: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
pub struct AlternatesResponse {
    pub alternates: Vec<Alternate>,
    pub html: String,
}

#[derive(Debug, Serialize)]
pub struct SwitchResponse {
    pub url: String,
    pub path: String,
    pub locale: Locale,
}

fn bad_request(message: &'static str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

pub async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_robots(&state.config.robots.rules, state.urls.base()),
    )
}

pub async fn sitemap_xml(State(state): State<AppState>) -> Response {
    let urls = state.urls.clone();
    let listings = state.listings.clone();

    let built = tokio::task::spawn_blocking(move || {
        render_xml(&build_entries(&urls, listings.as_ref(), Utc::now()))
    })
    .await;

    match built {
        Ok(Ok(xml)) => ([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml).into_response(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Sitemap rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Sitemap unavailable").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Sitemap generation task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Sitemap unavailable").into_response()
        }
    }
}

pub async fn alternates(State(state): State<AppState>, Query(query): Query<PathQuery>) -> Response {
    if !query.path.starts_with('/') {
        return bad_request("path must start with '/'");
    }
    let alternates = state.urls.alternates(&query.path);
    let html = link_tags(&alternates);
    Json(AlternatesResponse { alternates, html }).into_response()
}

pub async fn switch_locale(State(state): State<AppState>, Query(query): Query<SwitchQuery>) -> Response {
    if !query.path.starts_with('/') {
        return bad_request("path must start with '/'");
    }
    let Ok(locale) = query.to.parse::<Locale>() else {
        return bad_request("unsupported locale");
    };

    let mut response = Json(SwitchResponse {
        url: state.urls.href(&query.path, locale),
        path: state.urls.table().localized_path(&query.path, locale),
        locale,
    })
    .into_response();
    state.redirect.cookie.apply(response.headers_mut(), locale);
    response
}
