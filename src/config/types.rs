use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Home-Scraper
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// First search-results page to walk from
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Maximum number of detail pages fetched at once (1 = sequential)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Emit a progress line after this many completed detail pages
    #[serde(rename = "progress-interval", default = "default_progress_interval")]
    pub progress_interval: usize,

    /// Stop after this many index pages; unbounded when absent
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<usize>,

    /// Pause between index page fetches (milliseconds)
    #[serde(rename = "page-delay-ms", default)]
    pub page_delay_ms: u64,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(
        rename = "connect-timeout-secs",
        default = "default_connect_timeout_secs"
    )]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Site-specific markup description
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Selector matching each listing's link to its detail page
    #[serde(rename = "listing-link-selector")]
    pub listing_link_selector: String,

    /// Selector matching the links inside the pagination control
    #[serde(rename = "pagination-selector")]
    pub pagination_selector: String,

    /// Exact visible text of the "next page" link
    #[serde(rename = "next-page-text")]
    pub next_page_text: String,

    /// Fields extracted from every detail page
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

/// One field of a listing record
#[derive(Debug, Clone, Deserialize)]
pub struct FieldConfig {
    /// Key in the output JSON object
    pub name: String,

    pub selector: String,

    #[serde(default)]
    pub kind: FieldKind,

    /// A record is dropped when a required field yields nothing
    #[serde(default)]
    pub required: bool,
}

/// How a field's value is read out of the matched elements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Collapsed text of the first match
    #[default]
    Text,
    /// First decimal number in the first match's text
    Number,
    /// Text of every match
    List,
    /// `href`/`src` of the first match, made absolute
    Link,
    /// Each match is a row of `th`/`td` pairs
    Table,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the project root is resolved from
    #[serde(default = "default_output_root")]
    pub root: PathBuf,

    /// Directory name that marks the project root inside `root`
    #[serde(rename = "root-marker", default)]
    pub root_marker: Option<String>,

    /// Location of the JSON file below the project root
    #[serde(rename = "relative-path", default = "default_relative_path")]
    pub relative_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_output_root(),
            root_marker: None,
            relative_path: default_relative_path(),
        }
    }
}

fn default_concurrency() -> usize {
    1
}

fn default_progress_interval() -> usize {
    10
}

fn default_user_agent() -> String {
    format!("home-scraper/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_output_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_relative_path() -> PathBuf {
    PathBuf::from("frontend/public/static_data.json")
}
