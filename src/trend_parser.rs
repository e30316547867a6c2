use std::path::Path;

use chrono::NaiveDateTime;
use csv::ReaderBuilder;

use crate::errors::ParseError;
use crate::models::TrendRecord;

pub const TIMESTAMP_COLUMN: &str = "DateTime";
pub const SOURCE_COLUMN: &str = "Data Source";
pub const VALUE_COLUMN: &str = "Value";

/// Timestamp formats seen in trend exports. Tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
];

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Read a delimited trend export into records, in file order.
///
/// The header row must name the `DateTime`, `Data Source` and `Value`
/// columns (exact, case-sensitive); their positions do not matter. Any
/// malformed row or timestamp fails the whole file.
pub fn read_trend_file(path: &Path, delimiter: u8) -> Result<Vec<TrendRecord>, ParseError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let column = |name: &str| -> Result<usize, ParseError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ParseError::MissingColumn(name.to_string()))
    };
    let ts_idx = column(TIMESTAMP_COLUMN)?;
    let source_idx = column(SOURCE_COLUMN)?;
    let value_idx = column(VALUE_COLUMN)?;

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        let raw_ts = row.get(ts_idx).unwrap_or("");
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| ParseError::BadTimestamp {
            value: raw_ts.to_string(),
            // header is line 1
            line: i + 2,
        })?;

        records.push(TrendRecord {
            timestamp,
            source: row.get(source_idx).unwrap_or("").to_string(),
            value: row.get(value_idx).unwrap_or("").to_string(),
        });
    }

    Ok(records)
}
