//! Crawler module for walking the listing index and extracting detail pages
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - HTML parsing and link extraction
//! - Pagination traversal
//! - Detail page extraction
//! - Overall crawl coordination and progress reporting

mod coordinator;
mod detail;
mod fetcher;
mod pagination;
mod parser;
mod progress;

pub use coordinator::{run_crawl, Coordinator, CrawlResult};
pub use detail::{parse_detail, parse_number, DetailExtractor, ListingRecord};
pub use fetcher::{build_http_client, Fetcher};
pub use pagination::{PaginationWalker, SearchSession, WalkState};
pub use parser::{extract_detail_urls, find_next_page, resolve_link, LinkHandle, PageDocument};
pub use progress::{LogProgress, NoProgress, ProgressReporter};

use crate::config::Config;
use crate::output::{CrawlSummary, JsonFileSink};
use crate::ScraperError;
use std::path::PathBuf;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client and compile the site selectors
/// 2. Walk every index page from the start URL
/// 3. Extract each detail page
/// 4. Write the records to `output`, or to the file resolved from `[output]`
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl completed and results written
/// * `Err(ScraperError)` - Crawl failed
pub async fn crawl(
    config: Config,
    output: Option<PathBuf>,
) -> Result<CrawlSummary, ScraperError> {
    let sink = JsonFileSink::with_override(&config.output, output);
    run_crawl(&config, &sink).await
}
