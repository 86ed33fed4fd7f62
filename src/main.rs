//! # Fresh News Scraper
//!
//! Collects recent articles from a news site's search page and writes them
//! to a tabular report.
//!
//! ## Features
//!
//! - Drives the site's search, topic filter and newest-first sort
//! - Pages through results until the first article older than the requested
//!   number of months
//! - Retries every browser step with a fixed delay
//! - Saves article images next to the report
//! - Counts search phrase occurrences and flags money amounts per article
//! - Writes CSV (or JSON) plus a per-run log file
//!
//! ## Usage
//!
//! ```sh
//! fresh_news_scraper --work-item work-item.json -o ./output
//! ```
//!
//! ## Architecture
//!
//! 1. **Configuration**: config file, then work item, then command line
//! 2. **Navigation**: search, filter and sort through the [`browser::Browser`] seam
//! 3. **Extraction**: one record per result until the date window is left
//! 4. **Enrichment**: derived columns and deduplication
//! 5. **Output**: report file in the output directory

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, warn};

mod browser;
mod cli;
mod context;
mod enrich;
mod error;
mod extract;
mod images;
mod logging;
mod models;
mod outputs;
mod pagination;
mod retry;
mod settings;
#[cfg(test)]
mod testing;
mod utils;
mod window;
mod work_item;

use browser::{Browser, HttpBrowser};
use cli::Cli;
use context::RunContext;
use error::ScrapeError;
use images::HttpImageSink;
use models::SearchCriteria;
use pagination::PaginationController;
use settings::Settings;
use utils::ensure_writable_dir;
use work_item::WorkItems;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    // The output directory hosts the log file, so settings come first.
    let (mut settings, config_error) = match Settings::load(args.config.as_deref()) {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };
    args.apply_to_settings(&mut settings);
    logging::init(&settings.output_dir);

    let start_time = Instant::now();
    info!("fresh_news_scraper starting up");

    let outcome = match config_error {
        Some(e) => Err(e.into()),
        None => run(&args, settings).await,
    };

    let elapsed = start_time.elapsed();
    match outcome {
        Ok(count) => {
            info!(?elapsed, records = count, "Execution complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            let causes = error_causes(&e);
            error!(?elapsed, error = %e, ?causes, "Run failed");
            ExitCode::FAILURE
        }
    }
}

/// One complete scrape. Returns the number of records in the report.
async fn run(args: &Cli, mut settings: Settings) -> Result<usize, ScrapeError> {
    let work_items = WorkItems::from_path(args.work_item.as_deref());
    settings.apply_work_item(&work_items);
    let mut criteria = SearchCriteria::resolve(&work_items);
    args.apply_to_criteria(&mut criteria);

    let ctx = RunContext::new(criteria, settings, Local::now().date_naive());
    info!(
        phrase = %ctx.criteria.search_phrase,
        topic = %ctx.criteria.topic,
        months = ctx.criteria.number_of_months,
        window_start = %ctx.window.start,
        target = %ctx.settings.target_url,
        retries = ctx.retry.max_attempts(),
        delay = ?ctx.retry.delay(),
        "Run configured"
    );

    ensure_writable_dir(&ctx.settings.output_dir).await?;

    let browser = HttpBrowser::new(ctx.settings.poll_interval())?;
    let images = HttpImageSink::new()?;
    let scraped = PaginationController::new(&browser, &images, &ctx)
        .run()
        .await;
    if let Err(e) = browser.close().await {
        warn!(error = %e, "Failed to close browser");
    }
    let records = scraped?;

    let enriched = enrich::enrich(records, &ctx.criteria.search_phrase);
    outputs::write_report(&enriched, &ctx.settings.report_path()).await?;
    Ok(enriched.len())
}

/// Messages of every error below `e` in its `source()` chain, outermost first.
fn error_causes(e: &dyn Error) -> Vec<String> {
    std::iter::successors(e.source(), |&cause| cause.source())
        .map(ToString::to_string)
        .collect()
}
