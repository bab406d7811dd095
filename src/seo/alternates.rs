//! Absolute URLs and hreflang alternates.
//!
//! `SiteUrls::href` is the only place a public page URL is assembled. The
//! hreflang emitter, the sitemap and the language switcher all call it.

use quick_xml::escape::escape;
use serde::Serialize;
use std::sync::Arc;

use crate::locale::Locale;
use crate::routing::RouteTable;

/// hreflang value pointing at the fallback page.
pub const X_DEFAULT: &str = "x-default";

/// One alternate-language link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alternate {
    pub hreflang: &'static str,
    pub href: String,
}

/// Builds public URLs from the site base and the route table.
#[derive(Debug, Clone)]
pub struct SiteUrls {
    base: String,
    table: Arc<RouteTable>,
    default_locale: Locale,
}

impl SiteUrls {
    pub fn new(base: &str, table: Arc<RouteTable>, default_locale: Locale) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            table,
            default_locale,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Absolute URL of `path` in `locale`.
    pub fn href(&self, path: &str, locale: Locale) -> String {
        format!("{}{}", self.base, self.table.localized_path(path, locale))
    }

    /// One alternate per locale plus `x-default`.
    pub fn alternates(&self, path: &str) -> Vec<Alternate> {
        let mut out: Vec<Alternate> = Locale::ALL
            .into_iter()
            .map(|locale| Alternate {
                hreflang: locale.code(),
                href: self.href(path, locale),
            })
            .collect();
        out.push(Alternate {
            hreflang: X_DEFAULT,
            href: self.href(path, self.default_locale),
        });
        out
    }
}

/// `<link rel="alternate" ...>` tags for a page head.
pub fn link_tags(alternates: &[Alternate]) -> String {
    alternates
        .iter()
        .map(|a| {
            format!(
                r#"<link rel="alternate" hreflang="{}" href="{}" />"#,
                a.hreflang,
                escape(&a.href)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Value for an HTTP `Link` response header.
pub fn link_header(alternates: &[Alternate]) -> String {
    alternates
        .iter()
        .map(|a| format!(r#"<{}>; rel="alternate"; hreflang="{}""#, a.href, a.hreflang))
        .collect::<Vec<_>>()
        .join(", ")
}
