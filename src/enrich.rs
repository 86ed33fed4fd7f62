//! Report columns computed over the scraped records.

use crate::models::{ArticleRecord, EnrichedRecord};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, instrument};

/// `$11.10`, `$111,111.11`, `11 dollars`, `11 USD`, in any letter case.
static MONEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\$\d+(\.\d{1,2})?|\$\d{1,3}(,\d{3})*(\.\d{1,2})?|\d+ dollars|\d+ usd",
    )
    .unwrap()
});

/// Add the derived columns to every record and drop exact duplicates,
/// keeping the first occurrence in place.
#[instrument(level = "info", skip_all, fields(records = records.len()))]
pub fn enrich(records: Vec<ArticleRecord>, search_phrase: &str) -> Vec<EnrichedRecord> {
    let total = records.len();
    let enriched = records
        .into_iter()
        .map(|record| {
            let search_phrase_count = count_phrase_occurrences(search_phrase, &record.title)
                + count_phrase_occurrences(search_phrase, &record.description);
            let contains_money_mention =
                contains_money_mention(&format!("{} {}", record.title, record.description));
            EnrichedRecord {
                record,
                search_phrase_count,
                contains_money_mention,
            }
        })
        .unique()
        .collect::<Vec<_>>();

    info!(
        total,
        kept = enriched.len(),
        duplicates = total - enriched.len(),
        "Enriched records"
    );
    enriched
}

/// Non-overlapping, case-insensitive occurrences of `phrase` in `text`.
/// An empty phrase occurs zero times.
pub fn count_phrase_occurrences(phrase: &str, text: &str) -> usize {
    let phrase = phrase.to_lowercase();
    if phrase.is_empty() {
        return 0;
    }
    text.to_lowercase().matches(phrase.as_str()).count()
}

/// Whether `text` mentions an amount of money.
///
/// # Arguments
///
/// * `text` - Free text, usually title and description joined by a space
///
/// # Returns
///
/// `true` when any of the forms in [`MONEY`] occurs anywhere in `text`.
pub fn contains_money_mention(text: &str) -> bool {
    MONEY.is_match(text)
}
