//! Run settings loaded from `config.yaml`.
//!
//! Everything that varies between sites or environments lives here: the
//! target URL, retry and wait parameters, output locations and the locators
//! the engine hands to the browser. Every field has a default, so a partial
//! file (or no file at all) is valid.
//!
//! # Example
//!
//! ```yaml
//! target_url: https://www.latimes.com/
//! retries: 5
//! delay_seconds: 2.5
//! locators:
//!   next_page: "div.search-results-module-next-page a"
//! extraction:
//!   date_formats: ["%B %d, %Y"]
//! ```

use crate::error::{ConfigError, WorkItemError};
use crate::work_item::WorkItemSource;
use serde::Deserialize;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Config file read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

/// Placeholder substituted with the topic in filter locators.
pub const TOPIC_PLACEHOLDER: &str = "{topic}";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Page the run starts from.
    pub target_url: String,
    /// Attempts per guarded browser step.
    pub retries: u32,
    /// Pause between attempts.
    pub delay_seconds: f64,
    /// Bound for every wait-for-condition call.
    pub timeout_seconds: u64,
    /// How often the HTTP browser re-fetches a page while waiting.
    pub poll_interval_millis: u64,
    /// Directory for the report, images and log files.
    pub output_dir: PathBuf,
    /// Report file name; a `.json` extension selects JSON output.
    pub output_filename: String,
    /// Reject articles dated after today as well as before the window.
    pub enforce_upper_bound: bool,
    /// Stop after this many result pages even if more are available.
    pub max_pages: Option<u32>,
    pub locators: Locators,
    pub extraction: ExtractionSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_url: "https://www.latimes.com/".to_string(),
            retries: 3,
            delay_seconds: 5.0,
            timeout_seconds: 10,
            poll_interval_millis: 1000,
            output_dir: PathBuf::from("output"),
            output_filename: "scraped_news.csv".to_string(),
            enforce_upper_bound: false,
            max_pages: None,
            locators: Locators::default(),
            extraction: ExtractionSettings::default(),
        }
    }
}

/// Locators for the search workflow. `{topic}` is replaced with the run's topic.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Locators {
    pub search_button: String,
    pub search_input: String,
    /// Text that shows up once search results are rendered.
    pub results_marker: String,
    pub topic_label: String,
    pub topic_checkbox: String,
    /// Text confirming a filter was applied; `None` skips that wait.
    pub filters_marker: Option<String>,
    pub sort_select: String,
    /// Option value meaning "newest first".
    pub sort_newest_value: String,
    /// Matches only once the newest-first option is selected.
    pub sort_confirmation: String,
    /// One match per article on a results page.
    pub articles: String,
    pub next_page: String,
    pub article: ArticleLocators,
}

impl Default for Locators {
    fn default() -> Self {
        Self {
            search_button: "button[data-element='search-button']".to_string(),
            search_input: "input[data-element='search-form-input']".to_string(),
            results_marker: "Search results".to_string(),
            topic_label: "label >> text={topic}".to_string(),
            topic_checkbox: "label >> text={topic} >> input[type='checkbox']".to_string(),
            filters_marker: Some("Selected Filters".to_string()),
            sort_select: "select[name='s']".to_string(),
            sort_newest_value: "1".to_string(),
            sort_confirmation: "select[name='s'] option[value='1'][selected]".to_string(),
            articles: "li > ps-promo".to_string(),
            next_page: "div.search-results-module-next-page a".to_string(),
            article: ArticleLocators::default(),
        }
    }
}

impl Locators {
    pub fn topic_label_for(&self, topic: &str) -> String {
        self.topic_label.replace(TOPIC_PLACEHOLDER, topic)
    }

    pub fn topic_checkbox_for(&self, topic: &str) -> String {
        self.topic_checkbox.replace(TOPIC_PLACEHOLDER, topic)
    }
}

/// Locators relative to one article element.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArticleLocators {
    pub title: String,
    /// Link to the article page; `None` leaves `source_url` empty.
    pub link: Option<String>,
    pub description: String,
    pub date: String,
    pub image: String,
}

impl Default for ArticleLocators {
    fn default() -> Self {
        Self {
            title: "h3 a".to_string(),
            link: Some("h3 a".to_string()),
            description: "p.promo-description".to_string(),
            date: "p.promo-timestamp".to_string(),
            image: "picture img".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    /// `chrono` formats tried in order on the article date.
    pub date_formats: Vec<String>,
    /// Image extensions kept as they are (lowercase, without dot).
    pub image_extensions: Vec<String>,
    /// Extension appended to any other image filename.
    pub default_image_extension: String,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%B %d, %Y".to_string(),
                "%b. %d, %Y".to_string(),
                "%b %d, %Y".to_string(),
            ],
            image_extensions: vec!["jpg".to_string(), "png".to_string()],
            default_image_extension: "jpg".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from [`DEFAULT_CONFIG_PATH`] when it exists.
    ///
    /// An explicit path that cannot be read or parsed is an error; a missing
    /// default file just yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                if !default.exists() {
                    info!("No config file found; using built-in settings");
                    return Ok(Self::default());
                }
                default
            }
        };

        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let settings = Self::from_yaml(&raw).map_err(|source| ConfigError::Yaml {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Override settings with values supplied by the work item.
    ///
    /// Values that are missing are left alone; values that cannot be used
    /// are logged and ignored.
    pub fn apply_work_item<W: WorkItemSource>(&mut self, source: &W) {
        if let Some(retries) = read_parsed::<u32, W>(source, "retries") {
            self.retries = retries;
        }
        if let Some(delay) = read_parsed::<f64, W>(source, "delay_seconds") {
            if delay.is_finite() && delay >= 0.0 {
                self.delay_seconds = delay;
            } else {
                warn!(delay, "Ignoring negative or non-finite delay_seconds");
            }
        }
        if let Some(timeout) = read_parsed::<u64, W>(source, "timeout_seconds") {
            self.timeout_seconds = timeout;
        }
        if let Some(url) = read_parsed::<String, W>(source, "target_url") {
            self.target_url = url;
        }
        if let Some(filename) = read_parsed::<String, W>(source, "output_filename") {
            self.output_filename = filename;
        }
    }

    /// Pause between retry attempts.
    ///
    /// # Returns
    ///
    /// `delay_seconds` as a [`Duration`]; a value that does not fit one
    /// (negative, NaN, overflowing) becomes zero.
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_seconds).unwrap_or(Duration::ZERO)
    }

    /// Bound handed to every `wait_until_*` call of the run.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_millis)
    }

    /// Where the report is written: `output_filename` inside `output_dir`.
    ///
    /// The extension of this path picks the report format, see
    /// [`crate::outputs::write_report`].
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_filename)
    }
}

fn read_parsed<T, W>(source: &W, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
    W: WorkItemSource,
{
    let raw = match source.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) | Err(WorkItemError::Unavailable(_)) => return None,
        Err(e) => {
            warn!(key, error = %e, "Cannot read work item setting");
            return None;
        }
    };
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, value = %raw, error = %e, "Ignoring invalid work item setting");
            None
        }
    }
}
