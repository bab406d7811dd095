//! Tepoztlán directory edge service.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client Request
//!   ──────────────▶ request id ─▶ trace ─▶ locale redirect ─┬─▶ /api/contact (rate limited)
//!                                          │                 ├─▶ /sitemap.xml, /robots.txt
//!                                          │                 ├─▶ /api/alternates, /api/locale/switch
//!                                          ▼                 └─▶ pages ─▶ upstream renderer
//!                                 307 /{es|en}{path}
//!                                 + locale cookie
//! ```

use tokio::net::TcpListener;

use tepoz_edge::config;
use tepoz_edge::http::HttpServer;
use tepoz_edge::lifecycle::{wait_for_shutdown_signal, Shutdown};
use tepoz_edge::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_from_env()?;

    logging::init_logging(&config.observability);

    tracing::info!("tepoz-edge v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_url = %config.site.base_url,
        default_locale = %config.locale.default_locale,
        rate_limit_enabled = config.rate_limit.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            wait_for_shutdown_signal().await;
            shutdown.trigger();
        }
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
