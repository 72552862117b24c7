//! Run summary
//!
//! Counts gathered over one crawl, printed when the run finishes.

use crate::crawler::CrawlResult;
use std::path::PathBuf;
use std::time::Duration;

/// Summary of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// Index pages walked
    pub pages_visited: usize,

    /// Detail URLs collected from the index
    pub urls_collected: usize,

    /// Listings written
    pub records: usize,

    /// Where the listings were written
    pub output_path: PathBuf,

    pub elapsed: Duration,
}

impl CrawlSummary {
    pub fn new(result: &CrawlResult, output_path: PathBuf, elapsed: Duration) -> Self {
        Self {
            pages_visited: result.pages_visited,
            urls_collected: result.urls_collected,
            records: result.records.len(),
            output_path,
            elapsed,
        }
    }

    /// Detail pages that produced no record
    pub fn dropped(&self) -> usize {
        self.urls_collected.saturating_sub(self.records)
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.urls_collected == 0 {
            return 0.0;
        }
        (self.records as f64 / self.urls_collected as f64) * 100.0
    }
}

/// Prints the summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");
    println!("  Index pages:   {}", summary.pages_visited);
    println!("  Detail URLs:   {}", summary.urls_collected);
    println!("  Listings:      {}", summary.records);
    println!("  Dropped:       {}", summary.dropped());
    println!(
        "  Success rate:  {:.1}% in {:.1}s",
        summary.success_rate(),
        summary.elapsed.as_secs_f64()
    );
    println!("  Output:        {}", summary.output_path.display());
}
