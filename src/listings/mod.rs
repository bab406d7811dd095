//! Business listing enumeration.
//!
//! Listings feed the sitemap. The edge does not own listing data; it reads
//! whatever a `ListingSource` yields at request time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::locale::Locale;

/// One directory listing as enumerated by the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub lang: Locale,
    /// Category route in either spelling, e.g. `hospedaje/hoteles`.
    pub category: String,
    pub slug: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Errors raised while enumerating listings.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("failed to read listings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse listings from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("listing source unavailable: {0}")]
    Unavailable(String),
}

/// Anything that can enumerate the site's listings.
pub trait ListingSource: Send + Sync {
    fn listings(&self) -> Result<Vec<Listing>, ListingError>;
}

/// Fixed set of listings held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticListings(pub Vec<Listing>);

impl ListingSource for StaticListings {
    fn listings(&self) -> Result<Vec<Listing>, ListingError> {
        Ok(self.0.clone())
    }
}

/// Listings read from a JSON array on every call, so edits show up without a restart.
#[derive(Debug, Clone)]
pub struct JsonFileListings {
    path: PathBuf,
}

impl JsonFileListings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ListingSource for JsonFileListings {
    fn listings(&self) -> Result<Vec<Listing>, ListingError> {
        let content = fs::read_to_string(&self.path).map_err(|source| ListingError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ListingError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}
