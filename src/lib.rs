//! Home-Scraper: a real-estate listing harvester
//!
//! This crate walks a site's paginated search results, collects every
//! listing's detail-page URL, parses each detail page into a structured
//! record and writes the aggregate as a JSON document for the front-end.

pub mod config;
pub mod crawler;
pub mod output;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Home-Scraper operations
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Output error: {0}")]
    Persist(#[from] PersistError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failure to retrieve a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    /// The URL whose fetch failed
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. } | Self::Status { url, .. } => url,
        }
    }
}

/// Reasons a detail page produced no record
#[derive(Debug, Error)]
pub enum DetailError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Required field '{field}' not found on {url}")]
    Absent { url: String, field: String },
}

/// Failure to resolve or write the output artifact
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Project root marker '{marker}' not found in {}", path.display())]
    MarkerNotFound { marker: String, path: PathBuf },

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

/// Result type alias for Home-Scraper operations
pub type Result<T> = std::result::Result<T, ScraperError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlResult, ListingRecord};
