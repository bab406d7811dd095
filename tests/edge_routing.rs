//! In-process tests of the assembled router.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::Value;
use std::sync::Arc;

use tepoz_edge::http::HttpServer;
use tepoz_edge::listings::{Listing, StaticListings};
use tepoz_edge::locale::Locale;

mod common;

fn server() -> HttpServer {
    HttpServer::new(common::test_config()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn contact(body: &str) -> Request<Body> {
    Request::post("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

const VALID_CONTACT: &str = r#"{
    "name": "Luis",
    "email": "luis@example.com",
    "message": "Quisiera información sobre el temazcal."
}"#;

#[tokio::test]
async fn test_default_redirect_for_unprefixed_path() {
    let server = server();
    let response = common::send(&server, get("/hospedaje/hoteles")).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/es/hospedaje/hoteles");
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("locale=es;"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Max-Age=2592000"));
}

#[tokio::test]
async fn test_redirected_path_then_passes_through() {
    let server = server();
    for path in ["/", "/mapa", "/stay/hotels/casa-azul", "/eventos?mes=11"] {
        let request = Request::get(path)
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .body(Body::empty())
            .unwrap();
        let response = common::send(&server, request).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{path}");

        let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
        assert!(location.starts_with("/en"), "{location}");

        let followed = common::send(&server, get(&location)).await;
        assert_eq!(followed.status(), StatusCode::OK, "{location}");
        assert!(followed.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .starts_with("locale=en;"));
    }
}

#[tokio::test]
async fn test_page_descriptor_without_upstream() {
    let server = server();
    let response = common::send(&server, get("/en/eat/bars")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let link = response.headers()[header::LINK].to_str().unwrap().to_string();
    assert!(link.contains(r#"<https://tepoztlan.example/es/comer/bares>; rel="alternate"; hreflang="es""#));
    assert!(link.contains(r#"hreflang="x-default""#));

    let body: Value = serde_json::from_str(&common::body_string(response).await).unwrap();
    assert_eq!(body["locale"], "en");
    assert_eq!(body["canonical"], "https://tepoztlan.example/en/eat/bars");
}

#[tokio::test]
async fn test_url_consumers_agree() {
    let listing = Listing {
        lang: Locale::Es,
        category: "comer/cafeterias".into(),
        slug: "cafe-la-sombra".into(),
        updated_at: None,
    };
    let server = HttpServer::with_listings(
        common::test_config(),
        Arc::new(StaticListings(vec![listing])),
    )
    .unwrap();

    let page = "/es/comer/cafeterias/cafe-la-sombra";

    let switch: Value = serde_json::from_str(
        &common::body_string(common::send(&server, get(&format!("/api/locale/switch?path={page}&to=en"))).await).await,
    )
    .unwrap();
    let switched_url = switch["url"].as_str().unwrap().to_string();
    assert_eq!(switched_url, "https://tepoztlan.example/en/eat/cafes/cafe-la-sombra");
    assert_eq!(switch["path"], "/en/eat/cafes/cafe-la-sombra");

    let alternates: Value = serde_json::from_str(
        &common::body_string(common::send(&server, get(&format!("/api/alternates?path={page}"))).await).await,
    )
    .unwrap();
    let hreflang_url = alternates["alternates"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["hreflang"] == "en")
        .and_then(|a| a["href"].as_str())
        .unwrap()
        .to_string();
    assert!(alternates["html"].as_str().unwrap().contains(&hreflang_url));

    let sitemap = common::body_string(common::send(&server, get("/sitemap.xml")).await).await;
    let sitemap_tag = format!(r#"<xhtml:link rel="alternate" hreflang="en" href="{switched_url}"/>"#);
    assert!(sitemap.contains(&sitemap_tag), "{sitemap}");
    assert!(sitemap.contains(&format!("<loc>https://tepoztlan.example{page}</loc>")));

    assert_eq!(switched_url, hreflang_url);
}

#[tokio::test]
async fn test_switch_sets_cookie_and_rejects_unknown_locale() {
    let server = server();

    let response = common::send(&server, get("/api/locale/switch?path=/es/mapa&to=en")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .starts_with("locale=en;"));

    let response = common::send(&server, get("/api/locale/switch?path=/es/mapa&to=fr")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = common::send(&server, get("/api/alternates?path=es/mapa")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_robots_and_sitemap_are_not_redirected() {
    let server = server();

    let robots = common::send(&server, get("/robots.txt")).await;
    assert_eq!(robots.status(), StatusCode::OK);
    assert!(robots.headers().get(header::SET_COOKIE).is_none());
    assert!(common::body_string(robots)
        .await
        .ends_with("Sitemap: https://tepoztlan.example/sitemap.xml\n"));

    let sitemap = common::send(&server, get("/sitemap.xml")).await;
    assert_eq!(sitemap.status(), StatusCode::OK);
    assert_eq!(sitemap.headers()[header::CONTENT_TYPE], "application/xml; charset=utf-8");
}

#[tokio::test]
async fn test_sitemap_survives_listing_failure() {
    let mut config = common::test_config();
    config.listings.path = Some("/nonexistent/listings.json".into());
    let server = HttpServer::new(config).unwrap();

    let response = common::send(&server, get("/sitemap.xml")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let xml = common::body_string(response).await;
    assert!(xml.contains("<loc>https://tepoztlan.example/es</loc>"));
    assert!(xml.contains("<loc>https://tepoztlan.example/en/stay/hotels</loc>"));
}

#[tokio::test]
async fn test_contact_rate_limit() {
    let mut config = common::test_config();
    config.rate_limit.max_requests = 2;
    config.rate_limit.window_ms = 60_000;
    let server = HttpServer::new(config).unwrap();

    for remaining in ["1", "0"] {
        let response = common::send(&server, contact(VALID_CONTACT)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["x-ratelimit-remaining"], remaining);
    }

    let denied = common::send(&server, contact(VALID_CONTACT)).await;
    assert_eq!(denied.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = denied.headers()[header::RETRY_AFTER].to_str().unwrap().parse().unwrap();
    assert!((1..=60).contains(&retry_after));

    let body: Value = serde_json::from_str(&common::body_string(denied).await).unwrap();
    assert_eq!(body["error"], "rate_limited");
    assert_eq!(body["retry_after_secs"].as_u64(), Some(retry_after));

    assert_eq!(server.contacts().len(), 2);
}

#[tokio::test]
async fn test_contact_validation() {
    let server = server();

    let response = common::send(
        &server,
        contact(r#"{"name": "", "email": "nope", "message": "hola"}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = serde_json::from_str(&common::body_string(response).await).unwrap();
    assert_eq!(body["error"], "validation_failed");
    assert_eq!(body["fields"].as_array().unwrap().len(), 3);
    assert!(server.contacts().is_empty());
}

#[tokio::test]
async fn test_contact_locale_falls_back_to_detection() {
    let server = server();
    let request = Request::post("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT_LANGUAGE, "en-GB")
        .body(Body::from(VALID_CONTACT))
        .unwrap();

    let response = common::send(&server, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let pending = server.contacts().pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].locale, Locale::En);
}

fn take(limit: usize, key: Option<&str>) -> Request<Body> {
    let mut request = Request::post(format!("/api/admin/contacts/take?limit={limit}"));
    if let Some(key) = key {
        request = request.header(header::AUTHORIZATION, format!("Bearer {key}"));
    }
    request.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_full_contact_queue_refuses_until_taken() {
    let mut config = common::test_config();
    config.rate_limit.enabled = false;
    config.contact.queue_capacity = 2;
    config.contact.admin_api_key = Some("moderator-key".into());
    let server = HttpServer::new(config).unwrap();

    for _ in 0..2 {
        let response = common::send(&server, contact(VALID_CONTACT)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let refused = common::send(&server, contact(VALID_CONTACT)).await;
    assert_eq!(refused.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = serde_json::from_str(&common::body_string(refused).await).unwrap();
    assert_eq!(body["error"], "queue_full");
    assert_eq!(server.contacts().len(), 2);

    let unauthorized = common::send(&server, take(10, Some("wrong"))).await;
    assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(server.contacts().len(), 2);

    let taken = common::send(&server, take(1, Some("moderator-key"))).await;
    assert_eq!(taken.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&common::body_string(taken).await).unwrap();
    assert_eq!(body["submissions"].as_array().unwrap().len(), 1);
    assert_eq!(body["submissions"][0]["email"], "luis@example.com");
    assert_eq!(body["remaining"], 1);

    let response = common::send(&server, contact(VALID_CONTACT)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_moderation_route_absent_without_key() {
    let server = server();
    let response = common::send(&server, take(10, Some("anything"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_metrics_cover_all_routes() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let _guard = metrics::set_default_local_recorder(&recorder);

    let server = server();
    for uri in ["/hospedaje", "/robots.txt", "/sitemap.xml", "/api/alternates?path=/es/mapa"] {
        common::send(&server, get(uri)).await;
    }

    let rendered = handle.render();
    let count = |status: &str| {
        rendered
            .lines()
            .filter(|line| line.starts_with("edge_requests_total{"))
            .find(|line| line.contains(&format!("status=\"{status}\"")))
            .and_then(|line| line.rsplit(' ').next())
            .map(str::to_string)
    };
    assert_eq!(count("307").as_deref(), Some("1"), "{rendered}");
    assert_eq!(count("200").as_deref(), Some("3"), "{rendered}");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = server();

    let request = Request::get("/health")
        .header("x-request-id", "fixed-id")
        .body(Body::empty())
        .unwrap();
    let response = common::send(&server, request).await;
    assert_eq!(response.headers()["x-request-id"], "fixed-id");

    let response = common::send(&server, get("/health")).await;
    assert!(response.headers().get("x-request-id").is_some());
}
