//! Tab-separated parsing and column extraction

use reviewpulse_core::{Error, Result};
use tracing::debug;

const BOM: char = '\u{feff}';

/// Parse a tab-separated document and return the raw values of `column`.
///
/// The first row names the fields. Blank lines are skipped and rows may be
/// shorter or longer than the header; a row without a value at the column's
/// position contributes nothing. Values are returned untrimmed, in row order.
///
/// A header that lacks `column` is a parse error rather than a fallback to
/// another field. Empty or whitespace-only input yields no values.
pub fn parse_tsv(text: &str, column: &str) -> Result<Vec<String>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| Error::parse(format!("failed to read header row: {e}")))?
        .clone();

    let index = headers
        .iter()
        .position(|name| name.trim_start_matches(BOM).trim() == column)
        .ok_or_else(|| {
            Error::parse(format!(
                "header row has no \"{column}\" column (found: {})",
                headers
                    .iter()
                    .map(|name| name.trim_start_matches(BOM).trim())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;

    let mut values = Vec::new();
    let mut rows = 0usize;

    for record in reader.records() {
        let record = record.map_err(|e| Error::parse(format!("malformed row: {e}")))?;
        rows += 1;

        if let Some(value) = record.get(index) {
            values.push(value.to_string());
        }
    }

    debug!(rows, values = values.len(), column, "Parsed tab-separated source");

    Ok(values)
}
