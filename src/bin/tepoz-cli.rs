use axum::http::{header, HeaderMap, HeaderValue};
use chrono::Utc;
use clap::{Parser, Subcommand};
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

use tepoz_edge::config::{self, EdgeConfig};
use tepoz_edge::listings::{JsonFileListings, ListingSource, StaticListings};
use tepoz_edge::locale::{Locale, LocaleDetector};
use tepoz_edge::routing::RouteTable;
use tepoz_edge::seo::{build_entries, link_tags, render_robots, render_xml, SiteUrls};

#[derive(Parser)]
#[command(name = "tepoz-cli")]
#[command(about = "Inspect locale routing, sitemap and robots output, and drain the contact queue", long_about = None)]
struct Cli {
    /// TOML config file (defaults to TEPOZ_CONFIG or built-in defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run locale detection against sample request headers
    Detect {
        #[arg(long)]
        accept_language: Option<String>,
        #[arg(long)]
        cookie: Option<String>,
        #[arg(long)]
        timezone: Option<String>,
    },
    /// Translate a path into a locale and print its hreflang alternates
    Localize {
        path: String,
        #[arg(long, default_value = "en")]
        to: Locale,
    },
    /// Print sitemap.xml
    Sitemap {
        /// Listings JSON file (overrides listings.path)
        #[arg(long)]
        listings: Option<PathBuf>,
    },
    /// Print robots.txt
    Robots,
    /// Take queued contact submissions from a running edge (removes them)
    Contacts {
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
        /// Moderation key (defaults to contact.admin_api_key)
        #[arg(short, long)]
        key: Option<String>,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
}

fn load(cli_config: Option<&PathBuf>) -> Result<EdgeConfig, config::ConfigError> {
    match cli_config {
        Some(path) => config::load_config(path),
        None => config::load_from_env(),
    }
}

fn insert_header(headers: &mut HeaderMap, name: header::HeaderName, value: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(value) = value {
        headers.insert(name, HeaderValue::from_str(&value)?);
    }
    Ok(())
}

async fn take_contacts(url: &str, key: &str, limit: usize) -> Result<(), Box<dyn std::error::Error>> {
    let res = reqwest::Client::new()
        .post(format!("{}/api/admin/contacts/take", url.trim_end_matches('/')))
        .query(&[("limit", limit)])
        .header(AUTHORIZATION, format!("Bearer {key}"))
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: moderation endpoint returned status {status}");
        if let Ok(text) = res.text().await {
            eprintln!("Response: {text}");
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load(cli.config.as_ref())?;
    let table = Arc::new(RouteTable::site()?);
    let urls = SiteUrls::new(config.site.base(), table, config.locale.default_locale);

    match cli.command {
        Commands::Detect { accept_language, cookie, timezone } => {
            let mut headers = HeaderMap::new();
            insert_header(&mut headers, header::ACCEPT_LANGUAGE, accept_language)?;
            insert_header(&mut headers, header::COOKIE, cookie)?;
            let tz_header = header::HeaderName::from_bytes(config.locale.timezone_header.as_bytes())?;
            insert_header(&mut headers, tz_header, timezone)?;

            let ctx = LocaleDetector::new(&config.locale).detect(&headers);
            println!("{}", serde_json::to_string_pretty(&ctx)?);
        }
        Commands::Localize { path, to } => {
            println!("{}", urls.table().localized_path(&path, to));
            println!("{}", urls.href(&path, to));
            println!("{}", link_tags(&urls.alternates(&path)));
        }
        Commands::Sitemap { listings } => {
            let source: Box<dyn ListingSource> = match listings.or_else(|| config.listings.path.clone().map(PathBuf::from)) {
                Some(path) => Box::new(JsonFileListings::new(path)),
                None => Box::new(StaticListings::default()),
            };
            print!("{}", render_xml(&build_entries(&urls, source.as_ref(), Utc::now()))?);
        }
        Commands::Robots => {
            print!("{}", render_robots(&config.robots.rules, urls.base()));
        }
        Commands::Contacts { url, key, limit } => {
            let Some(key) = key.or_else(|| config.contact.admin_api_key.clone()) else {
                return Err("no moderation key: pass --key or set contact.admin_api_key".into());
            };
            take_contacts(&url, &key, limit).await?;
        }
    }

    Ok(())
}
