use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::models::{CellValue, TrendGrid};

/// Output grid period used by the converter.
pub const RESAMPLE_STEP_MINUTES: i64 = 15;

/// Floor a timestamp to the step grid, aligned to midnight of its day.
fn floor_to_step(ts: NaiveDateTime, step: Duration) -> NaiveDateTime {
    let midnight = ts.date().and_time(NaiveTime::MIN);
    let into_day = (ts - midnight).num_seconds();
    midnight + Duration::seconds(into_day - into_day % step.num_seconds())
}

/// Re-grid onto a fixed step with hold-last-known-value semantics.
///
/// Output rows run from the floored first timestamp to the floored last
/// timestamp, inclusive. Each output cell holds the most recent non-missing
/// value at or before its row's timestamp, per column independently. Cells
/// before a column's first sample stay missing. Strictly step/hold, never
/// interpolation.
pub fn resample_pad(grid: &TrendGrid, step_minutes: i64) -> TrendGrid {
    if grid.is_empty() {
        return TrendGrid {
            timestamps: Vec::new(),
            columns: grid.columns.clone(),
            cells: Vec::new(),
        };
    }

    let step = Duration::minutes(step_minutes);
    let start = floor_to_step(grid.timestamps[0], step);
    let end = floor_to_step(grid.timestamps[grid.timestamps.len() - 1], step);

    let mut timestamps = Vec::new();
    let mut t = start;
    while t <= end {
        timestamps.push(t);
        t = t + step;
    }

    let mut cells = vec![vec![CellValue::Missing; grid.columns.len()]; timestamps.len()];
    for col in 0..grid.columns.len() {
        let mut src_row = 0;
        let mut held = CellValue::Missing;
        for (out_row, out_ts) in timestamps.iter().enumerate() {
            while src_row < grid.timestamps.len() && grid.timestamps[src_row] <= *out_ts {
                if !grid.cells[src_row][col].is_missing() {
                    held = grid.cells[src_row][col].clone();
                }
                src_row += 1;
            }
            cells[out_row][col] = held.clone();
        }
    }

    TrendGrid {
        timestamps,
        columns: grid.columns.clone(),
        cells,
    }
}

/// Convert each column to numbers when every non-missing cell parses as one;
/// otherwise leave the column as its original text. Never fails, never drops
/// a column.
pub fn infer_numeric_columns(grid: &mut TrendGrid) {
    for col in 0..grid.columns.len() {
        let mut parsed: Vec<(usize, f64)> = Vec::new();
        let mut all_numeric = true;
        for row in 0..grid.timestamps.len() {
            match &grid.cells[row][col] {
                CellValue::Missing => {}
                CellValue::Number(n) => parsed.push((row, *n)),
                CellValue::Text(s) => match s.trim().parse::<f64>() {
                    Ok(n) => parsed.push((row, n)),
                    Err(_) => {
                        all_numeric = false;
                        break;
                    }
                },
            }
        }
        if all_numeric {
            for (row, n) in parsed {
                grid.cells[row][col] = CellValue::Number(n);
            }
        }
    }
}
