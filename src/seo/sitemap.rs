//! Sitemap generation.
//!
//! # Responsibilities
//! - One entry per static route per locale
//! - One entry per enumerated listing, deduplicated by URL
//! - es/en alternates on every entry
//!
//! # Design Decisions
//! - Listing enumeration failure degrades to static entries only
//! - URLs come from `SiteUrls::href`, same as hreflang and the switcher
//! - Markup is written with quick-xml events, which escape text and attributes

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;
use std::collections::HashSet;
use std::io;
use thiserror::Error;

use crate::listings::ListingSource;
use crate::locale::Locale;
use crate::observability::metrics;
use crate::routing::RouteKind;
use crate::seo::alternates::SiteUrls;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("failed to write sitemap XML: {0}")]
    Write(#[from] io::Error),

    #[error("failed to write sitemap XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("sitemap XML is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// How often a page is expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
        }
    }
}

/// Spanish and English URLs of the same page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleAlternates {
    pub es: String,
    pub en: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
    pub alternates: LocaleAlternates,
}

fn alternates_for(urls: &SiteUrls, path: &str) -> LocaleAlternates {
    LocaleAlternates {
        es: urls.href(path, Locale::Es),
        en: urls.href(path, Locale::En),
    }
}

/// Collect every sitemap entry. Never fails; listing errors are logged.
pub fn build_entries(urls: &SiteUrls, listings: &dyn ListingSource, now: DateTime<Utc>) -> Vec<SitemapEntry> {
    let mut entries = Vec::new();
    let mut seen = HashSet::new();

    let mut push = |entry: SitemapEntry, entries: &mut Vec<SitemapEntry>| {
        if seen.insert(entry.url.clone()) {
            entries.push(entry);
        }
    };

    for locale in Locale::ALL {
        push(
            SitemapEntry {
                url: urls.href("/", locale),
                last_modified: now,
                change_frequency: ChangeFrequency::Daily,
                priority: 1.0,
                alternates: alternates_for(urls, "/"),
            },
            &mut entries,
        );
    }

    for route in urls.table().entries() {
        let (change_frequency, priority) = match route.kind {
            RouteKind::Category => (ChangeFrequency::Weekly, 0.8),
            RouteKind::Page => (ChangeFrequency::Monthly, 0.5),
        };
        for locale in Locale::ALL {
            push(
                SitemapEntry {
                    url: urls.href(route.spanish, locale),
                    last_modified: now,
                    change_frequency,
                    priority,
                    alternates: alternates_for(urls, route.spanish),
                },
                &mut entries,
            );
        }
    }

    match listings.listings() {
        Ok(listings) => {
            tracing::debug!(count = listings.len(), "Enumerated listings for sitemap");
            for listing in listings {
                let path = format!(
                    "{}/{}",
                    listing.category.trim_matches('/'),
                    listing.slug.trim_matches('/')
                );
                push(
                    SitemapEntry {
                        url: urls.href(&path, listing.lang),
                        last_modified: listing.updated_at.unwrap_or(now),
                        change_frequency: ChangeFrequency::Weekly,
                        priority: 0.7,
                        alternates: alternates_for(urls, &path),
                    },
                    &mut entries,
                );
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Listing enumeration failed, emitting static routes only");
            metrics::record_sitemap_listing_failure();
        }
    }

    entries
}

fn text_element<W: io::Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<(), SitemapError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Render entries as a sitemap XML document with xhtml alternates.
pub fn render_xml(entries: &[SitemapEntry]) -> Result<String, SitemapError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NS), ("xmlns:xhtml", XHTML_NS)]),
    ))?;

    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        text_element(&mut writer, "loc", &entry.url)?;
        text_element(
            &mut writer,
            "lastmod",
            &entry.last_modified.to_rfc3339_opts(SecondsFormat::Secs, true),
        )?;
        text_element(&mut writer, "changefreq", entry.change_frequency.as_str())?;
        text_element(&mut writer, "priority", &format!("{:.1}", entry.priority))?;
        for (lang, href) in [("es", &entry.alternates.es), ("en", &entry.alternates.en)] {
            writer.write_event(Event::Empty(BytesStart::new("xhtml:link").with_attributes([
                ("rel", "alternate"),
                ("hreflang", lang),
                ("href", href.as_str()),
            ])))?;
        }
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;

    let mut xml = String::from_utf8(writer.into_inner())?;
    xml.push('\n');
    Ok(xml)
}
