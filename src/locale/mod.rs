//! Locale subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (cookies, Accept-Language, timezone hint)
//!     → detector.rs (priority chain, first match wins)
//!     → LocaleContext { locale, source }
//!     → redirect middleware / locale cookie
//! ```
//!
//! # Design Decisions
//! - Closed set of locales: anything unsupported is treated as absent
//! - Detection never fails; the configured default is the last resort

pub mod detector;

pub use detector::{LocaleContext, LocaleDetector, LocaleSource};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported site language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    /// All supported locales, default first.
    pub const ALL: [Locale; 2] = [Locale::Es, Locale::En];

    /// Wire code used in paths, cookies and hreflang attributes.
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Es => "es",
            Locale::En => "en",
        }
    }

    /// The other supported locale.
    pub fn other(&self) -> Locale {
        match self {
            Locale::Es => Locale::En,
            Locale::En => Locale::Es,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a string is not a supported locale code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale: {0}")]
pub struct UnsupportedLocale(pub String);

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    /// Exact, case-sensitive match on the wire code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "es" => Ok(Locale::Es),
            "en" => Ok(Locale::En),
            other => Err(UnsupportedLocale(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes() {
        assert_eq!("es".parse::<Locale>(), Ok(Locale::Es));
        assert_eq!("en".parse::<Locale>(), Ok(Locale::En));
        assert!("EN".parse::<Locale>().is_err());
        assert!("fr".parse::<Locale>().is_err());
        assert!("".parse::<Locale>().is_err());
    }

    #[test]
    fn test_default_and_other() {
        assert_eq!(Locale::default(), Locale::Es);
        assert_eq!(Locale::Es.other(), Locale::En);
        assert_eq!(Locale::En.other(), Locale::Es);
        assert_eq!(Locale::En.to_string(), "en");
    }
}
