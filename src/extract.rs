//! Turning one search-result element into an [`ArticleRecord`].
//!
//! Missing or malformed optional fields never fail an extraction: an absent
//! title or description becomes an empty string, an unparsable date becomes
//! today, a missing image leaves the filename empty. Only a failure of the
//! element handle itself is returned as an error, for the caller's retry
//! policy to deal with.

use crate::browser::PageElement;
use crate::error::BrowserError;
use crate::models::{ArticleRecord, ExtractedArticle};
use crate::settings::{ArticleLocators, ExtractionSettings};
use chrono::NaiveDate;
use tracing::{debug, instrument, warn};

/// Percent-encoded path separator found inside image proxy URLs.
const ENCODED_SEPARATOR: &str = "%2f";

/// Reads article fields with configurable locators and date formats.
#[derive(Debug, Clone)]
pub struct ArticleExtractor {
    locators: ArticleLocators,
    extraction: ExtractionSettings,
}

impl ArticleExtractor {
    pub fn new(locators: ArticleLocators, extraction: ExtractionSettings) -> Self {
        Self {
            locators,
            extraction,
        }
    }

    /// Extract one article. `today` replaces dates that cannot be parsed.
    #[instrument(level = "debug", skip_all)]
    pub async fn extract<E: PageElement>(
        &self,
        handle: &E,
        today: NaiveDate,
    ) -> Result<ExtractedArticle, BrowserError> {
        let title = handle.text(&self.locators.title).await?.unwrap_or_default();
        if title.is_empty() {
            warn!(locator = %self.locators.title, "Article has no title");
        }

        let source_url = match &self.locators.link {
            Some(link) => handle.attribute(link, "href").await?,
            None => None,
        };

        let description = handle
            .text(&self.locators.description)
            .await?
            .unwrap_or_default();

        let raw_date = handle.text(&self.locators.date).await?;
        let published_date = self.parse_date(raw_date.as_deref(), today);

        let image_url = handle.attribute(&self.locators.image, "src").await?;
        let image_filename = image_url.as_deref().and_then(|url| {
            image_filename(
                url,
                &self.extraction.image_extensions,
                &self.extraction.default_image_extension,
            )
        });

        debug!(%title, %published_date, ?image_filename, "Extracted article");
        Ok(ExtractedArticle {
            record: ArticleRecord {
                title,
                description,
                published_date,
                source_url,
                image_filename,
            },
            image_url,
        })
    }

    /// Parse `raw` with the configured formats, or fall back to `today`.
    pub fn parse_date(&self, raw: Option<&str>, today: NaiveDate) -> NaiveDate {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            warn!(%today, "Article has no date; using today");
            return today;
        };

        self.extraction
            .date_formats
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
            .unwrap_or_else(|| {
                warn!(raw, %today, "Unrecognised article date; using today");
                today
            })
    }
}

/// Derive the stored filename for an image URL.
///
/// Takes the last path segment, then whatever follows the last encoded
/// separator (`%2F`) in it. If the extension is not one of `extensions`,
/// `.{default_extension}` is appended to the whole name, so `photo.gif`
/// becomes `photo.gif.jpg`. Returns `None` when nothing usable is left.
pub fn image_filename(url: &str, extensions: &[String], default_extension: &str) -> Option<String> {
    let segment = url.trim().rsplit('/').next().unwrap_or_default();
    let name = match segment.to_ascii_lowercase().rfind(ENCODED_SEPARATOR) {
        Some(idx) => &segment[idx + ENCODED_SEPARATOR.len()..],
        None => segment,
    };
    if name.is_empty() {
        return None;
    }

    let whitelisted = name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)));
    if whitelisted {
        Some(name.to_string())
    } else {
        Some(format!("{name}.{default_extension}"))
    }
}
