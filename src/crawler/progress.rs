//! Crawl progress reporting
//!
//! The walker and coordinator report through [`ProgressReporter`] so that
//! progress output stays out of the crawl logic. [`LogProgress`] is the
//! default and writes through `tracing`.

/// Receives progress events during a crawl
///
/// All methods default to doing nothing. Implementations must be thread-safe.
pub trait ProgressReporter: Send + Sync {
    /// An index page was fetched and its detail links collected
    ///
    /// * `page` - 1-based page number
    /// * `found` - detail URLs on this page
    /// * `total` - detail URLs collected so far
    fn index_page(&self, page: usize, found: usize, total: usize) {
        let _ = (page, found, total);
    }

    /// Pagination finished
    fn walk_finished(&self, pages: usize, total: usize) {
        let _ = (pages, total);
    }

    /// A detail page finished, successfully or not
    ///
    /// * `completed` - detail pages finished so far
    /// * `total` - detail pages in this run
    fn detail_completed(&self, completed: usize, total: usize) {
        let _ = (completed, total);
    }
}

/// Logs progress via `tracing`, one detail line every `interval` items
#[derive(Debug, Clone)]
pub struct LogProgress {
    interval: usize,
}

impl LogProgress {
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
        }
    }

    /// Whether a detail progress line is due
    pub fn should_report(&self, completed: usize, total: usize) -> bool {
        completed % self.interval == 0 || completed == total
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ProgressReporter for LogProgress {
    fn index_page(&self, page: usize, found: usize, total: usize) {
        tracing::info!("Page {}: {} listings (total {})", page, found, total);
    }

    fn walk_finished(&self, pages: usize, total: usize) {
        tracing::info!(
            "Reached last page: {} detail URLs across {} pages",
            total,
            pages
        );
    }

    fn detail_completed(&self, completed: usize, total: usize) {
        if self.should_report(completed, total) {
            tracing::info!("Processed {}/{} detail pages", completed, total);
        }
    }
}

/// Discards all progress events
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {}
