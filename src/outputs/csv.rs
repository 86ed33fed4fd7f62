//! CSV report.
//!
//! One row per record under the header
//!
//! ```text
//! Title,Date,Description,Link,Picture Filename,Search Phrases Count,Contains Money Format
//! ```
//!
//! Dates are written as `YYYY-MM-DD`; absent link or picture cells are empty.

use crate::error::ReportError;
use crate::models::EnrichedRecord;
use serde::Serialize;

const HEADER: [&str; 7] = [
    "Title",
    "Date",
    "Description",
    "Link",
    "Picture Filename",
    "Search Phrases Count",
    "Contains Money Format",
];

/// Cells of one row, in [`HEADER`] order.
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    title: &'a str,
    date: String,
    description: &'a str,
    link: &'a str,
    picture_filename: &'a str,
    search_phrases_count: usize,
    contains_money_format: bool,
}

impl<'a> From<&'a EnrichedRecord> for ReportRow<'a> {
    fn from(enriched: &'a EnrichedRecord) -> Self {
        let record = &enriched.record;
        Self {
            title: &record.title,
            date: record.published_date.format("%Y-%m-%d").to_string(),
            description: &record.description,
            link: record.source_url.as_deref().unwrap_or_default(),
            picture_filename: record.image_filename.as_deref().unwrap_or_default(),
            search_phrases_count: enriched.search_phrase_count,
            contains_money_format: enriched.contains_money_mention,
        }
    }
}

/// Encode `records` as CSV, header included even when there are no rows.
pub fn render(records: &[EnrichedRecord]) -> Result<Vec<u8>, ReportError> {
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for record in records {
        writer.serialize(ReportRow::from(record))?;
    }
    writer
        .into_inner()
        .map_err(|e| ReportError::Io(e.into_error()))
}
