//! Error types for every concern of a scrape run.
//!
//! Each collaborator has its own enum so call sites can tell a transient
//! browser failure from a broken config file. [`ScrapeError`] is the umbrella
//! type that reaches `main` and decides the process exit code.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failures raised by a [`crate::browser::Browser`] or one of its element handles.
///
/// `NotFound`, `Timeout` and `Http` are the transient automation failures
/// that [`crate::retry::RetryPolicy`] retries; see [`BrowserError::is_transient`].
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid locator `{locator}`: {reason}")]
    InvalidLocator { locator: String, reason: String },

    #[error("no element matches `{0}`")]
    NotFound(String),

    #[error("timed out after {timeout:?} waiting for {condition}")]
    Timeout { condition: String, timeout: Duration },

    #[error("no page is open")]
    NoPage,

    #[error("element `{locator}` does not support {action}")]
    Unsupported {
        locator: String,
        action: &'static str,
    },
}

impl BrowserError {
    /// Whether another attempt at the same step could succeed.
    ///
    /// A malformed locator or URL, an action the element cannot take, or a
    /// step run with no page open fails the same way every time.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http(_) | Self::NotFound(_) | Self::Timeout { .. })
    }
}

/// Problems loading the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse config {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Failures of the work-item provider. Any of these makes the run fall back
/// to the default search criteria.
#[derive(Debug, Error)]
pub enum WorkItemError {
    #[error("no work item available: {0}")]
    Unavailable(String),

    #[error("cannot read work item {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse work item {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("work item value for `{key}` is not a scalar")]
    NotScalar { key: String },

    #[error("work item value for `{key}` is invalid: {value}")]
    Invalid { key: String, value: String },
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("download failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cannot write image: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fatal failure of a run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("cannot set up image capture: {0}")]
    Images(#[from] ImageError),

    #[error("output directory {path} is not writable: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
}
