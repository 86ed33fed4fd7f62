//! Tracing setup: console output plus a plain-text log file per run.

use chrono::Local;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt as tfmt};

/// Install the global subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Besides the
/// console, events go to `<output_dir>/scraper_YYYYmmdd_HHMMSS.log`; if that
/// file cannot be created the run logs to the console only.
pub fn init(output_dir: &Path) -> Option<PathBuf> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = tfmt::layer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(UtcTime::rfc_3339());

    let path = output_dir.join(log_file_name(Local::now()));
    let (file_layer, opened) = match open_log_file(&path) {
        Ok(file) => {
            let layer = tfmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_timer(UtcTime::rfc_3339())
                .with_writer(Mutex::new(file));
            (Some(layer), Ok(path))
        }
        Err(e) => (None, Err((path, e))),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();

    match opened {
        Ok(path) => {
            info!(path = %path.display(), "Logging to file");
            Some(path)
        }
        Err((path, e)) => {
            warn!(path = %path.display(), error = %e, "Cannot open log file; logging to console only");
            None
        }
    }
}

fn log_file_name(now: chrono::DateTime<Local>) -> String {
    now.format("scraper_%Y%m%d_%H%M%S.log").to_string()
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}
