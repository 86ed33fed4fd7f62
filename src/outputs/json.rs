//! JSON report: a pretty-printed array of enriched records.

use crate::error::ReportError;
use crate::models::EnrichedRecord;

/// Serialize `records` as a pretty-printed JSON array, record fields
/// flattened next to the derived columns.
///
/// # Errors
///
/// Returns [`ReportError::Json`] if a record cannot be serialized.
pub fn render(records: &[EnrichedRecord]) -> Result<Vec<u8>, ReportError> {
    Ok(serde_json::to_vec_pretty(records)?)
}
