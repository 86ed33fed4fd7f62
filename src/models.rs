//! Data models for search criteria and scraped articles.
//!
//! This module defines the records that flow through a run:
//! - [`SearchCriteria`]: what to search for, fixed for the whole run
//! - [`ArticleRecord`]: one article as extracted from a results page
//! - [`ExtractedArticle`]: a record plus the image URL still to be captured
//! - [`EnrichedRecord`]: a record with the derived report columns

use chrono::NaiveDate;
use serde::Serialize;

/// Search phrase, topic filter and recency of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    /// The phrase typed into the site search box.
    pub search_phrase: String,
    /// Label of the topic filter to tick; empty skips filtering.
    pub topic: String,
    /// How many calendar months back articles are accepted.
    pub number_of_months: u32,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            search_phrase: "climate change".to_string(),
            topic: "California".to_string(),
            number_of_months: 1,
        }
    }
}

/// An article as read from a search-results page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ArticleRecord {
    pub title: String,
    pub description: String,
    /// Always a valid date; today when the page showed something unparsable.
    pub published_date: NaiveDate,
    /// Absolute URL of the article detail page, when the result links to one.
    pub source_url: Option<String>,
    /// Name the article image is stored under in the output directory.
    pub image_filename: Option<String>,
}

/// Output of the extractor: the record plus the absolute image URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArticle {
    pub record: ArticleRecord,
    pub image_url: Option<String>,
}

/// An [`ArticleRecord`] with the columns computed after scraping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: ArticleRecord,
    /// Case-insensitive occurrences of the search phrase in title and description.
    pub search_phrase_count: usize,
    /// Whether title or description mention an amount of money.
    pub contains_money_mention: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_criteria() {
        let criteria = SearchCriteria::default();
        assert_eq!(criteria.search_phrase, "climate change");
        assert_eq!(criteria.topic, "California");
        assert_eq!(criteria.number_of_months, 1);
    }

    #[test]
    fn test_enriched_record_serializes_flat() {
        let enriched = EnrichedRecord {
            record: ArticleRecord {
                title: "Heat wave".to_string(),
                description: "Record temperatures".to_string(),
                published_date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
                source_url: None,
                image_filename: Some("heat.jpg".to_string()),
            },
            search_phrase_count: 0,
            contains_money_mention: false,
        };

        let json = serde_json::to_value(&enriched).unwrap();
        assert_eq!(json["title"], "Heat wave");
        assert_eq!(json["image_filename"], "heat.jpg");
        assert_eq!(json["search_phrase_count"], 0);
    }
}
