//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, path from TEPOZ_CONFIG)
//!     → loader.rs (parse & deserialize, SITE_URL override)
//!     → validation.rs (semantic checks)
//!     → EdgeConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{
    ContactConfig, EdgeConfig, ListenerConfig, ListingsConfig, LocaleConfig, ObservabilityConfig,
    RateLimitConfig, RobotsConfig, RobotsRule, SiteConfig, TimeoutConfig, UpstreamConfig,
};
