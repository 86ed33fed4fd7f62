//! Report writers for the enriched records.
//!
//! # Submodules
//!
//! - [`csv`]: tabular report, the default
//! - [`json`]: pretty-printed JSON array, picked by a `.json` extension
//!
//! Both create missing parent directories and replace an existing report.

pub mod csv;
pub mod json;

use crate::error::ReportError;
use crate::models::EnrichedRecord;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Write `records` to `path`, choosing the format from its extension.
#[instrument(level = "info", skip_all, fields(path = %path.display(), records = records.len()))]
pub async fn write_report(records: &[EnrichedRecord], path: &Path) -> Result<(), ReportError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let bytes = if is_json {
        json::render(records)?
    } else {
        csv::render(records)?
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, bytes).await?;
    info!(format = if is_json { "json" } else { "csv" }, "Wrote report");
    Ok(())
}
