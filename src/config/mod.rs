//! Configuration module for Home-Scraper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use home_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Walking from: {}", config.crawler.start_url);
//! ```

mod parser;
mod site;
mod types;
mod validation;

// Re-export types
pub use site::{compile_selector, FieldSpec, SiteProfile};
pub use types::{
    Config, CrawlerConfig, FieldConfig, FieldKind, HttpConfig, OutputConfig, SiteConfig,
};
pub use validation::{validate_start_url, MAX_CONCURRENCY};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
