//! Request middleware.

pub mod admin_auth;
pub mod locale_redirect;
pub mod metrics;

pub use admin_auth::{admin_auth_middleware, AdminKey};
pub use locale_redirect::{locale_redirect_middleware, LocaleRedirectState};
pub use metrics::track_request_metrics;
