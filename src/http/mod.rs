//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → request.rs (request ID, tracing span)
//!     → middleware/metrics.rs (request count and latency)
//!     → middleware/locale_redirect.rs (redirect or pass through)
//!     → security::rate_limit (form routes only)
//!     → middleware/admin_auth.rs (moderation routes only)
//!     → contact.rs / seo.rs / pages.rs (handlers)
//!     → upstream.rs (forward pages to the renderer)
//!     → response.rs (cookies, redirects, header hygiene)
//! ```

pub mod contact;
pub mod middleware;
pub mod pages;
pub mod request;
pub mod response;
pub mod seo;
pub mod server;
pub mod upstream;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer, ServerError};
