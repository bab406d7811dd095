//! Bidirectional Spanish/English route table.
//!
//! # Responsibilities
//! - Hold the static route mapping, validated once at startup
//! - Translate paths between spellings (longest mapped prefix, slugs untouched)
//! - Produce the locale-prefixed path used by every URL consumer
//!
//! # Design Decisions
//! - Two pre-built maps (es → en, en → es) for O(1) lookup both ways
//! - Unmapped segments pass through unchanged
//! - A spelling may appear on the other side only within its own entry

use std::collections::HashMap;
use thiserror::Error;

use crate::locale::Locale;

/// What a mapped route is, for sitemap weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Directory hub listing businesses of one category.
    Category,
    /// Informational page.
    Page,
}

/// One row of the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub spanish: &'static str,
    pub english: &'static str,
    pub kind: RouteKind,
}

const fn category(spanish: &'static str, english: &'static str) -> RouteEntry {
    RouteEntry { spanish, english, kind: RouteKind::Category }
}

const fn page(spanish: &'static str, english: &'static str) -> RouteEntry {
    RouteEntry { spanish, english, kind: RouteKind::Page }
}

/// Site routes as shipped.
pub const SITE_ROUTES: &[RouteEntry] = &[
    category("hospedaje", "stay"),
    category("hospedaje/hoteles", "stay/hotels"),
    category("hospedaje/eco-hoteles", "stay/eco-lodges"),
    category("hospedaje/rentas-vacacionales", "stay/vacation-rentals"),
    category("comer", "eat"),
    category("comer/restaurantes", "eat/restaurants"),
    category("comer/cafeterias", "eat/cafes"),
    category("comer/bares", "eat/bars"),
    category("comer/comida-callejera", "eat/street-food"),
    page("que-hacer", "things-to-do"),
    page("que-hacer/tepozteco", "things-to-do/tepozteco"),
    page("que-hacer/mercado", "things-to-do/market"),
    page("eventos", "events"),
    page("mapa", "map"),
    page("nosotros", "about"),
    page("contacto", "contact"),
    page("favoritos", "favorites"),
    page("privacidad", "privacy"),
    page("terminos", "terms"),
];

/// Route table construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteTableError {
    #[error("Spanish segment '{0}' is mapped more than once")]
    DuplicateSpanish(String),

    #[error("English segment '{0}' is mapped more than once")]
    DuplicateEnglish(String),

    #[error("segment '{0}' is used as both a Spanish and an English spelling of different routes")]
    Ambiguous(String),

    #[error("route segment must not be empty")]
    Empty,
}

/// Immutable route lookup shared by all URL consumers.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    es_to_en: HashMap<&'static str, &'static str>,
    en_to_es: HashMap<&'static str, &'static str>,
    max_depth: usize,
}

impl RouteTable {
    /// Build and validate a table from entries.
    pub fn new(entries: &[RouteEntry]) -> Result<Self, RouteTableError> {
        let mut es_to_en = HashMap::with_capacity(entries.len());
        let mut en_to_es = HashMap::with_capacity(entries.len());
        let mut max_depth = 0;

        for entry in entries {
            let spanish = entry.spanish.trim_matches('/');
            let english = entry.english.trim_matches('/');
            if spanish.is_empty() || english.is_empty() {
                return Err(RouteTableError::Empty);
            }
            if es_to_en.insert(spanish, english).is_some() {
                return Err(RouteTableError::DuplicateSpanish(spanish.to_string()));
            }
            if en_to_es.insert(english, spanish).is_some() {
                return Err(RouteTableError::DuplicateEnglish(english.to_string()));
            }
            max_depth = max_depth.max(spanish.split('/').count()).max(english.split('/').count());
        }

        for (spanish, english) in &es_to_en {
            if let Some(other) = en_to_es.get(spanish) {
                if other != spanish || english != spanish {
                    return Err(RouteTableError::Ambiguous(spanish.to_string()));
                }
            }
        }

        Ok(Self {
            entries: entries.to_vec(),
            es_to_en,
            en_to_es,
            max_depth,
        })
    }

    /// The shipped site table.
    pub fn site() -> Result<Self, RouteTableError> {
        Self::new(SITE_ROUTES)
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Translate a path (without locale prefix) into `locale`'s spelling.
    ///
    /// The longest mapped prefix is translated; the rest is kept verbatim.
    pub fn to_locale(&self, path: &str, locale: Locale) -> String {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return String::new();
        }

        let forward = match locale {
            Locale::En => &self.es_to_en,
            Locale::Es => &self.en_to_es,
        };

        for depth in (1..=segments.len().min(self.max_depth)).rev() {
            let prefix = segments[..depth].join("/");
            let translated = match forward.get(prefix.as_str()) {
                Some(target) => *target,
                None => continue,
            };
            let mut out = translated.to_string();
            for rest in &segments[depth..] {
                out.push('/');
                out.push_str(rest);
            }
            return out;
        }

        segments.join("/")
    }

    /// `/{locale}/{translated}` for a path with or without a locale prefix.
    ///
    /// Hreflang tags, the sitemap and the language switcher all go through here.
    pub fn localized_path(&self, path: &str, locale: Locale) -> String {
        let rest = match split_locale_prefix(path) {
            Some((_, rest)) => rest,
            None => path,
        };
        let translated = self.to_locale(rest, locale);
        if translated.is_empty() {
            format!("/{}", locale.code())
        } else {
            format!("/{}/{}", locale.code(), translated)
        }
    }
}

/// Split `/es/...` or `/en/...` into the locale and the remaining path.
///
/// Only an exact first segment counts: `/espanol` has no prefix.
pub fn split_locale_prefix(path: &str) -> Option<(Locale, &str)> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let (first, rest) = match trimmed.find('/') {
        Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
        None => (trimmed, ""),
    };
    first.parse::<Locale>().ok().map(|locale| (locale, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::site().unwrap()
    }

    #[test]
    fn test_site_table_is_valid() {
        let table = table();
        assert_eq!(table.entries().len(), SITE_ROUTES.len());
    }

    #[test]
    fn test_translate_both_ways() {
        let table = table();
        assert_eq!(table.to_locale("hospedaje/hoteles", Locale::En), "stay/hotels");
        assert_eq!(table.to_locale("stay/hotels", Locale::Es), "hospedaje/hoteles");
        assert_eq!(table.to_locale("/comer/bares/", Locale::En), "eat/bars");
    }

    #[test]
    fn test_already_target_spelling_is_unchanged() {
        let table = table();
        assert_eq!(table.to_locale("stay/hotels", Locale::En), "stay/hotels");
        assert_eq!(table.to_locale("hospedaje", Locale::Es), "hospedaje");
    }

    #[test]
    fn test_slugs_pass_through() {
        let table = table();
        assert_eq!(
            table.to_locale("hospedaje/hoteles/posada-del-tepozteco", Locale::En),
            "stay/hotels/posada-del-tepozteco"
        );
        assert_eq!(table.to_locale("unknown/page", Locale::En), "unknown/page");
        assert_eq!(table.to_locale("", Locale::En), "");
    }

    #[test]
    fn test_round_trip_every_entry() {
        let table = table();
        for entry in table.entries() {
            for via in Locale::ALL {
                let es = table.to_locale(&table.to_locale(entry.spanish, via), Locale::Es);
                assert_eq!(es, entry.spanish, "via {via}");
                let en = table.to_locale(&table.to_locale(entry.english, via), Locale::En);
                assert_eq!(en, entry.english, "via {via}");
            }
        }
    }

    #[test]
    fn test_localized_path() {
        let table = table();
        assert_eq!(table.localized_path("/es/hospedaje/hoteles", Locale::En), "/en/stay/hotels");
        assert_eq!(table.localized_path("/en/stay", Locale::Es), "/es/hospedaje");
        assert_eq!(table.localized_path("/en", Locale::Es), "/es");
        assert_eq!(table.localized_path("/", Locale::En), "/en");
        assert_eq!(table.localized_path("/mapa", Locale::En), "/en/map");
    }

    #[test]
    fn test_split_locale_prefix() {
        assert_eq!(split_locale_prefix("/es"), Some((Locale::Es, "")));
        assert_eq!(split_locale_prefix("/en/stay/hotels"), Some((Locale::En, "/stay/hotels")));
        assert_eq!(split_locale_prefix("/espanol"), None);
        assert_eq!(split_locale_prefix("/"), None);
        assert_eq!(split_locale_prefix("/fr/x"), None);
    }

    #[test]
    fn test_rejects_duplicates() {
        let dup_es = [page("a", "x"), page("a", "y")];
        assert_eq!(
            RouteTable::new(&dup_es).unwrap_err(),
            RouteTableError::DuplicateSpanish("a".into())
        );

        let dup_en = [page("a", "x"), page("b", "x")];
        assert_eq!(
            RouteTable::new(&dup_en).unwrap_err(),
            RouteTableError::DuplicateEnglish("x".into())
        );
    }

    #[test]
    fn test_rejects_cross_spelling() {
        let crossed = [page("a", "b"), page("b", "c")];
        assert_eq!(
            RouteTable::new(&crossed).unwrap_err(),
            RouteTableError::Ambiguous("b".into())
        );

        // Same spelling on both sides of one entry is fine.
        assert!(RouteTable::new(&[page("blog", "blog")]).is_ok());
    }
}
