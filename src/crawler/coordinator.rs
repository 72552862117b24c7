//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives one run end to end:
//! - Walking the paginated index to collect detail URLs
//! - Extracting detail pages through a bounded pool of in-flight requests
//! - Keeping records in detail-URL order regardless of completion order
//! - Handing the result to a sink

use crate::config::{Config, CrawlerConfig, SiteProfile, MAX_CONCURRENCY};
use crate::crawler::detail::{DetailExtractor, ListingRecord};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::pagination::PaginationWalker;
use crate::crawler::progress::{LogProgress, ProgressReporter};
use crate::output::{CrawlSummary, ResultSink};
use crate::{ConfigError, ScraperError};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Records of one crawl, in detail-URL order
#[derive(Debug, Clone, Default)]
pub struct CrawlResult {
    /// Successfully parsed listings
    pub records: Vec<ListingRecord>,

    /// Index pages walked
    pub pages_visited: usize,

    /// Detail URLs collected; never less than `records.len()`
    pub urls_collected: usize,
}

impl CrawlResult {
    /// Detail pages that produced no record
    pub fn dropped(&self) -> usize {
        self.urls_collected.saturating_sub(self.records.len())
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    fetcher: Fetcher,
    site: SiteProfile,
    crawler: CrawlerConfig,
    progress: Arc<dyn ProgressReporter>,
}

impl Coordinator {
    /// Creates a coordinator from a validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Selectors compiled and HTTP client built
    /// * `Err(ScraperError)` - A selector failed to compile or the client could not be built
    pub fn new(config: &Config) -> Result<Self, ScraperError> {
        let site = SiteProfile::compile(&config.site)?;
        let fetcher = Fetcher::from_config(&config.http)?;

        Ok(Self {
            fetcher,
            site,
            crawler: config.crawler.clone(),
            progress: Arc::new(LogProgress::new(config.crawler.progress_interval)),
        })
    }

    /// Replaces the default logging progress reporter
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Number of detail pages fetched at once
    pub fn concurrency(&self) -> usize {
        self.crawler.concurrency.clamp(1, MAX_CONCURRENCY)
    }

    /// Walks the index from `start_url` and extracts every listing
    ///
    /// Any index page failure aborts the run. Detail page failures only
    /// drop that listing.
    pub async fn run(&self, start_url: &Url) -> Result<CrawlResult, ScraperError> {
        tracing::info!("Walking search results from {}", start_url);

        let session = PaginationWalker::new(&self.fetcher, &self.site, self.progress.as_ref())
            .with_max_pages(self.crawler.max_pages)
            .with_page_delay(Duration::from_millis(self.crawler.page_delay_ms))
            .walk_session(start_url)
            .await?;

        let records = self.extract_all(&session.detail_urls).await;

        let result = CrawlResult {
            records,
            pages_visited: session.page,
            urls_collected: session.detail_urls.len(),
        };
        tracing::info!(
            "Extracted {} listings ({} dropped)",
            result.records.len(),
            result.dropped()
        );
        Ok(result)
    }

    /// Extracts every detail URL, keeping the successes in input order
    ///
    /// Up to [`concurrency`](Self::concurrency) pages are in flight at once.
    /// Each finished page lands in its own slot; absent slots are dropped
    /// when compacting.
    pub async fn extract_all(&self, urls: &[Url]) -> Vec<ListingRecord> {
        let extractor = DetailExtractor::new(&self.fetcher, &self.site);
        let extractor = &extractor;
        let total = urls.len();

        let mut slots: Vec<Option<ListingRecord>> = (0..total).map(|_| None).collect();
        let mut completed = 0;

        if total == 0 {
            self.progress.detail_completed(0, 0);
            return Vec::new();
        }

        let mut pending = stream::iter(urls.iter().enumerate())
            .map(|(index, url)| async move { (index, extractor.extract_detail(url).await) })
            .buffer_unordered(self.concurrency());

        while let Some((index, record)) = pending.next().await {
            slots[index] = record;
            completed += 1;
            self.progress.detail_completed(completed, total);
        }

        slots.into_iter().flatten().collect()
    }
}

/// Runs a crawl from the configured start URL and persists it through `sink`
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl finished and results were written
/// * `Err(ScraperError)` - Index walk failed or output could not be written
///
/// # Example
///
/// ```no_run
/// use home_scraper::config::load_config;
/// use home_scraper::crawler::run_crawl;
/// use home_scraper::output::JsonFileSink;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let sink = JsonFileSink::from_config(&config.output);
/// run_crawl(&config, &sink).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    sink: &dyn ResultSink,
) -> Result<CrawlSummary, ScraperError> {
    let start_url = Url::parse(&config.crawler.start_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid start_url '{}': {}", config.crawler.start_url, e))
    })?;

    let started = Instant::now();
    let coordinator = Coordinator::new(config)?;
    tracing::info!("Fetching detail pages with concurrency {}", coordinator.concurrency());

    let result = coordinator.run(&start_url).await?;
    let output_path = sink.persist(&result)?;

    Ok(CrawlSummary::new(&result, output_path, started.elapsed()))
}
