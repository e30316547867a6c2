use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDateTime;

use crate::models::{CellValue, TrendGrid, TrendRecord};

/// Collapse duplicate (timestamp, source) pairs, keeping the first
/// occurrence in file order. Relative order of survivors is preserved.
pub fn dedup_records(records: Vec<TrendRecord>) -> Vec<TrendRecord> {
    let mut seen: HashSet<(NaiveDateTime, String)> = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert((r.timestamp, r.source.clone())))
        .collect()
}

/// Reshape deduplicated long-format records into a wide grid.
///
/// Rows are the distinct timestamps, sorted ascending. Columns are the
/// distinct source names in first-appearance order. Records with an empty
/// source name get no column. An empty value field becomes `Missing`, so
/// resampling fills it from upstream like any other gap.
pub fn pivot_records(records: &[TrendRecord]) -> TrendGrid {
    let timestamps: Vec<NaiveDateTime> = records
        .iter()
        .map(|r| r.timestamp)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let row_index: HashMap<NaiveDateTime, usize> = timestamps
        .iter()
        .enumerate()
        .map(|(i, ts)| (*ts, i))
        .collect();

    let mut columns: Vec<String> = Vec::new();
    let mut col_index: HashMap<String, usize> = HashMap::new();
    for record in records {
        if record.source.is_empty() {
            continue;
        }
        if !col_index.contains_key(&record.source) {
            col_index.insert(record.source.clone(), columns.len());
            columns.push(record.source.clone());
        }
    }

    let mut cells = vec![vec![CellValue::Missing; columns.len()]; timestamps.len()];
    for record in records {
        let Some(&col) = col_index.get(&record.source) else {
            continue;
        };
        let row = row_index[&record.timestamp];
        cells[row][col] = if record.value.trim().is_empty() {
            CellValue::Missing
        } else {
            CellValue::Text(record.value.clone())
        };
    }

    TrendGrid {
        timestamps,
        columns,
        cells,
    }
}
