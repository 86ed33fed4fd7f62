//! Command-line interface definitions for Fresh News Scraper.
//!
//! Every option can also come from an environment variable, so a scheduler
//! can configure a run without building an argument list. Options given
//! here override both the work item and the config file.

use crate::models::SearchCriteria;
use crate::settings::Settings;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Fresh News Scraper application.
///
/// # Examples
///
/// ```sh
/// # Defaults: config/config.yaml if present, no work item
/// fresh_news_scraper
///
/// # Work item from the scheduler, report into ./out
/// fresh_news_scraper --work-item work-item.json -o ./out
///
/// # Ad-hoc search
/// fresh_news_scraper -s "wildfire smoke" -t California -n 2
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to config.yaml file
    #[arg(short, long, env = "SCRAPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Work item (YAML or JSON) with the search criteria
    #[arg(short, long, env = "SCRAPER_WORK_ITEM")]
    pub work_item: Option<PathBuf>,

    /// Directory for the report, images and log file
    #[arg(short, long, env = "SCRAPER_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Search phrase, overriding the work item
    #[arg(short, long)]
    pub search_phrase: Option<String>,

    /// Topic filter, overriding the work item
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Months of news to collect (0 and 1 both mean the current month)
    #[arg(short = 'n', long)]
    pub months: Option<u32>,
}

impl Cli {
    /// Settings that must be known before logging starts.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(dir) = &self.output_dir {
            settings.output_dir = dir.clone();
        }
    }

    pub fn apply_to_criteria(&self, criteria: &mut SearchCriteria) {
        if let Some(phrase) = &self.search_phrase {
            criteria.search_phrase = phrase.clone();
        }
        if let Some(topic) = &self.topic {
            criteria.topic = topic.clone();
        }
        if let Some(months) = self.months {
            criteria.number_of_months = months;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "fresh_news_scraper",
            "--config",
            "conf.yaml",
            "--work-item",
            "item.json",
            "--output-dir",
            "./out",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("conf.yaml")));
        assert_eq!(cli.work_item, Some(PathBuf::from("item.json")));
        assert_eq!(cli.output_dir, Some(PathBuf::from("./out")));
        assert_eq!(cli.search_phrase, None);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "fresh_news_scraper",
            "-s",
            "wildfire smoke",
            "-t",
            "Politics",
            "-n",
            "3",
        ]);

        assert_eq!(cli.search_phrase.as_deref(), Some("wildfire smoke"));
        assert_eq!(cli.topic.as_deref(), Some("Politics"));
        assert_eq!(cli.months, Some(3));
    }

    #[test]
    fn test_cli_overrides_only_given_values() {
        let cli = Cli::parse_from(["fresh_news_scraper", "-t", "Sports", "-o", "elsewhere"]);

        let mut criteria = SearchCriteria::default();
        cli.apply_to_criteria(&mut criteria);
        assert_eq!(criteria.search_phrase, "climate change");
        assert_eq!(criteria.topic, "Sports");
        assert_eq!(criteria.number_of_months, 1);

        let mut settings = Settings::default();
        cli.apply_to_settings(&mut settings);
        assert_eq!(settings.output_dir, PathBuf::from("elsewhere"));
    }
}
