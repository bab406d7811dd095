//! Forwarding to the page renderer.
//!
//! # Responsibilities
//! - Rewrite the request URI onto the upstream authority
//! - Strip hop-by-hop headers, add `X-Forwarded-For`
//! - Bound the upstream call with a timeout, mapping failures to 502/504

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{
        uri::{Authority, Scheme},
        HeaderValue, Request, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::http::request::request_id;
use crate::http::response::strip_hop_by_hop;

/// HTTP client bound to one upstream renderer.
#[derive(Clone)]
pub struct Upstream {
    client: Client<HttpConnector, Body>,
    authority: Authority,
    timeout: Duration,
}

impl std::fmt::Debug for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upstream")
            .field("authority", &self.authority)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Upstream {
    /// Build a client for `address` (`host:port`).
    pub fn new(address: &str, timeout: Duration) -> Result<Self, axum::http::uri::InvalidUri> {
        let authority = Authority::from_str(address)?;
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Ok(Self {
            client,
            authority,
            timeout,
        })
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    fn rewrite_uri(&self, original: &Uri) -> Result<Uri, axum::http::Error> {
        let path_and_query = original
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
    }

    /// Forward `request` and return the upstream response.
    pub async fn forward(&self, request: Request<Body>) -> Response {
        let request_id = request_id(request.headers()).to_string();
        let (mut parts, body) = request.into_parts();

        parts.uri = match self.rewrite_uri(&parts.uri) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Failed to build upstream URI");
                return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
            }
        };

        strip_hop_by_hop(&mut parts.headers);
        if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
            if let Ok(value) = HeaderValue::from_str(&addr.ip().to_string()) {
                parts.headers.append("x-forwarded-for", value);
            }
        }

        let upstream_request = Request::from_parts(parts, body);

        match tokio::time::timeout(self.timeout, self.client.request(upstream_request)).await {
            Ok(Ok(response)) => {
                let (mut parts, body) = response.into_parts();
                strip_hop_by_hop(&mut parts.headers);
                Response::from_parts(parts, Body::new(body))
            }
            Ok(Err(e)) => {
                tracing::error!(request_id = %request_id, upstream = %self.authority, error = %e, "Upstream error");
                (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
            }
            Err(_) => {
                tracing::error!(request_id = %request_id, upstream = %self.authority, "Upstream timed out");
                (StatusCode::GATEWAY_TIMEOUT, "Upstream timed out").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_uri_keeps_path_and_query() {
        let upstream = Upstream::new("127.0.0.1:3000", Duration::from_secs(1)).unwrap();
        let uri: Uri = "/es/mapa?zoom=14".parse().unwrap();
        assert_eq!(
            upstream.rewrite_uri(&uri).unwrap().to_string(),
            "http://127.0.0.1:3000/es/mapa?zoom=14"
        );
    }

    #[test]
    fn test_rejects_bad_address() {
        assert!(Upstream::new("not a host", Duration::from_secs(1)).is_err());
    }
}
