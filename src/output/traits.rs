//! Result sink trait
//!
//! A sink receives the finished crawl once and persists it somewhere.

use crate::crawler::CrawlResult;
use crate::PersistError;
use std::path::PathBuf;

/// Persists a finished crawl
pub trait ResultSink {
    /// Writes the records of `result`
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Where the records were written
    /// * `Err(PersistError)` - The location could not be resolved or written;
    ///   nothing was written in that case
    fn persist(&self, result: &CrawlResult) -> Result<PathBuf, PersistError>;
}
