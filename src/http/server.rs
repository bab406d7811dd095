//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build shared state (route table, detector, limiter, listings, contact queue)
//! - Create the Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, metrics, locale redirect, rate limit)
//! - Serve until the shutdown signal, running the rate-limit sweeper alongside

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::EdgeConfig;
use crate::contact::ContactStore;
use crate::http::middleware::{
    admin_auth_middleware, locale_redirect_middleware, track_request_metrics, AdminKey, LocaleRedirectState,
};
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::http::upstream::Upstream;
use crate::http::{contact, pages, seo};
use crate::listings::{JsonFileListings, ListingSource, StaticListings};
use crate::routing::{RouteTable, RouteTableError};
use crate::security::rate_limit::{rate_limit_middleware, RateLimiterState};
use crate::seo::SiteUrls;

/// Errors raised while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("route table: {0}")]
    RouteTable(#[from] RouteTableError),

    #[error("invalid upstream address '{address}': {source}")]
    InvalidUpstream {
        address: String,
        #[source]
        source: axum::http::uri::InvalidUri,
    },
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EdgeConfig>,
    pub urls: SiteUrls,
    pub redirect: LocaleRedirectState,
    pub rate_limiter: RateLimiterState,
    pub listings: Arc<dyn ListingSource>,
    pub contacts: ContactStore,
    pub upstream: Option<Upstream>,
}

/// HTTP server for the edge service.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server, reading listings from `listings.path` when configured.
    pub fn new(config: EdgeConfig) -> Result<Self, ServerError> {
        let listings: Arc<dyn ListingSource> = match &config.listings.path {
            Some(path) => Arc::new(JsonFileListings::new(path)),
            None => Arc::new(StaticListings::default()),
        };
        Self::with_listings(config, listings)
    }

    /// Create a server with an explicit listing source.
    pub fn with_listings(config: EdgeConfig, listings: Arc<dyn ListingSource>) -> Result<Self, ServerError> {
        let table = Arc::new(RouteTable::site()?);
        let urls = SiteUrls::new(config.site.base(), table, config.locale.default_locale);

        let upstream = match &config.upstream.address {
            Some(address) => Some(
                Upstream::new(address, Duration::from_secs(config.timeouts.upstream_secs)).map_err(|source| {
                    ServerError::InvalidUpstream {
                        address: address.clone(),
                        source,
                    }
                })?,
            ),
            None => None,
        };

        let state = AppState {
            urls,
            redirect: LocaleRedirectState::new(&config.locale),
            rate_limiter: RateLimiterState::new(&config.rate_limit),
            listings,
            contacts: ContactStore::new(config.contact.queue_capacity),
            upstream,
            config: Arc::new(config),
        };

        let router = Self::build_router(state.clone());
        Ok(Self { router, state })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let config = state.config.clone();

        let mut forms = Router::new().route("/api/contact", post(contact::submit_contact));
        if config.rate_limit.enabled {
            forms = forms.route_layer(middleware::from_fn_with_state(
                state.rate_limiter.clone(),
                rate_limit_middleware,
            ));
        }

        let mut moderation = Router::new();
        if let Some(key) = &config.contact.admin_api_key {
            moderation = moderation
                .route("/api/admin/contacts/take", post(contact::take_contacts))
                .route_layer(middleware::from_fn_with_state(
                    AdminKey(Arc::from(key.as_str())),
                    admin_auth_middleware,
                ));
        }

        Router::new()
            .route("/health", get(health))
            .route("/robots.txt", get(seo::robots_txt))
            .route("/sitemap.xml", get(seo::sitemap_xml))
            .route("/api/alternates", get(seo::alternates))
            .route("/api/locale/switch", get(seo::switch_locale))
            .merge(forms)
            .merge(moderation)
            .fallback(pages::page_handler)
            .layer(middleware::from_fn_with_state(
                state.redirect.clone(),
                locale_redirect_middleware,
            ))
            .with_state(state)
            .layer(middleware::from_fn(track_request_metrics))
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
                    .layer(propagate_request_id_layer()),
            )
    }

    /// The assembled router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Submissions received by this server.
    pub fn contacts(&self) -> ContactStore {
        self.state.contacts.clone()
    }

    pub fn config(&self) -> &EdgeConfig {
        &self.state.config
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = ?self.state.upstream.as_ref().map(|u| u.authority().to_string()),
            "HTTP server starting"
        );

        if self.state.config.rate_limit.enabled {
            let limiter = self.state.rate_limiter.limiter.clone();
            let interval = Duration::from_secs(self.state.config.rate_limit.sweep_interval_secs);
            tokio::spawn(limiter.run_sweeper(interval, shutdown.resubscribe()));
        }

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
