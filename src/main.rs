//! Home-Scraper main entry point
//!
//! This is the command-line interface for the Home-Scraper listing harvester.

use anyhow::Context;
use clap::Parser;
use home_scraper::config::{load_config_with_hash, validate_start_url, Config, MAX_CONCURRENCY};
use home_scraper::crawler::crawl;
use home_scraper::output::{print_summary, JsonFileSink};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Home-Scraper: a real-estate listing harvester
///
/// Walks a site's paginated search results, parses every listing's detail
/// page and writes the records as a JSON file for the front-end.
#[derive(Parser, Debug)]
#[command(name = "home-scraper")]
#[command(version)]
#[command(about = "A real-estate listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Search-results URL to start from (overrides crawler.start-url)
    #[arg(long, value_name = "URL")]
    start_url: Option<String>,

    /// Number of detail pages fetched at once (overrides crawler.concurrency)
    #[arg(
        short = 'j',
        long,
        value_name = "N",
        value_parser = clap::value_parser!(u16).range(1..=MAX_CONCURRENCY as i64)
    )]
    concurrency: Option<u16>,

    /// Write the JSON file here instead of resolving it from [output]
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    apply_overrides(&mut config, &cli)?;

    if cli.dry_run {
        let sink = JsonFileSink::with_override(&config.output, cli.output.clone());
        handle_dry_run(&config, &sink);
        return Ok(());
    }

    let summary = crawl(config, cli.output.clone()).await.map_err(|e| {
        tracing::error!("Crawl failed: {}", e);
        e
    })?;

    tracing::info!("Crawl completed successfully");
    if !cli.quiet {
        print_summary(&summary);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("home_scraper=info,warn"),
            1 => EnvFilter::new("home_scraper=debug,info"),
            2 => EnvFilter::new("home_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) -> anyhow::Result<()> {
    if let Some(start_url) = &cli.start_url {
        validate_start_url(start_url)?;
        config.crawler.start_url = start_url.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = usize::from(concurrency);
    }
    Ok(())
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, sink: &JsonFileSink) {
    println!("=== Home-Scraper Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", config.crawler.start_url);
    println!("  Concurrency: {}", config.crawler.concurrency);
    println!("  Progress interval: {}", config.crawler.progress_interval);
    match config.crawler.max_pages {
        Some(max) => println!("  Max pages: {}", max),
        None => println!("  Max pages: unlimited"),
    }

    println!("\nSite:");
    println!("  Listing links: {}", config.site.listing_link_selector);
    println!(
        "  Pagination: {} (next = \"{}\")",
        config.site.pagination_selector, config.site.next_page_text
    );
    println!("  Fields ({}):", config.site.fields.len());
    for field in &config.site.fields {
        println!(
            "    - {} [{:?}{}] {}",
            field.name,
            field.kind,
            if field.required { ", required" } else { "" },
            field.selector
        );
    }

    println!("\nOutput:");
    match sink.resolve() {
        Ok(path) => println!("  {}", path.display()),
        Err(e) => println!("  ✗ {}", e),
    }

    println!("\n✓ Configuration is valid");
}
