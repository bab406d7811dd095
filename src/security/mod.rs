//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Form submission (POST /api/contact):
//!     → rate_limit.rs (fixed window per client IP)
//!     → 429 with Retry-After, or on to the handler
//! ```
//!
//! # Design Decisions
//! - Limiter state is owned by the server and injected, never a process-wide static
//! - Only form endpoints are limited; page traffic is not

pub mod rate_limit;

pub use rate_limit::{FixedWindowLimiter, RateLimitDecision, RateLimiterState};
