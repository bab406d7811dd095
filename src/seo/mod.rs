//! Search-engine facing output: hreflang alternates, sitemap, robots.txt.
//!
//! # Data Flow
//! ```text
//! RouteTable + site base URL
//!     → alternates.rs (SiteUrls: the one URL builder)
//!     → sitemap.rs (static routes + ListingSource)
//!     → robots.rs (configured rule groups + sitemap location)
//! ```

pub mod alternates;
pub mod robots;
pub mod sitemap;

pub use alternates::{link_header, link_tags, Alternate, SiteUrls};
pub use robots::render_robots;
pub use sitemap::{build_entries, render_xml, ChangeFrequency, SitemapEntry, SitemapError};
