//! Output module for persisting crawl results
//!
//! This module handles:
//! - Writing listing records as the front-end's JSON file
//! - Resolving the output location from the project root
//! - Summarizing a finished run

mod json;
pub mod stats;
mod traits;

pub use json::{find_project_root, JsonFileSink, OUTPUT_ROOT_ENV};
pub use stats::{print_summary, CrawlSummary};
pub use traits::ResultSink;
