//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming path
//!     → matcher.rs (asset/API exclusions, bypass locale handling)
//!     → table.rs (locale prefix split, es ↔ en translation)
//!     → localized path for redirects, hreflang, sitemap, switcher
//!
//! Table compilation (at startup):
//!     RouteEntry[]
//!     → validate bijection
//!     → build forward and reverse maps
//!     → freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Table built at startup, immutable at runtime, shared via Arc
//! - No regex in the hot path
//! - Deterministic: same (path, locale) always yields the same URL

pub mod matcher;
pub mod table;

pub use matcher::{AnyMatcher, Matcher};
pub use table::{split_locale_prefix, RouteEntry, RouteKind, RouteTable, RouteTableError};
