//! Tepoztlán directory edge service.
//!
//! Sits in front of the bilingual site renderer and owns locale routing:
//! Spanish/English route mapping, locale detection and redirects, hreflang
//! alternates, sitemap and robots output, plus fixed-window rate limiting for
//! the contact form.

// Core subsystems
pub mod config;
pub mod http;
pub mod locale;
pub mod routing;

// Site content
pub mod contact;
pub mod listings;
pub mod seo;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::EdgeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use locale::Locale;
pub use routing::RouteTable;
