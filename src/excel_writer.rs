use std::fs;
use std::path::Path;

use rust_xlsxwriter::{Workbook, XlsxError};

use crate::errors::WriteError;
use crate::models::{CellValue, TrendGrid};

const TIMESTAMP_HEADER: &str = "DateTime";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn build_workbook(grid: &TrendGrid) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    sheet.write_string(0, 0, TIMESTAMP_HEADER)?;
    for (col, name) in grid.columns.iter().enumerate() {
        sheet.write_string(0, (col + 1) as u16, name.as_str())?;
    }

    for (row, ts) in grid.timestamps.iter().enumerate() {
        let row = (row + 1) as u32;
        sheet.write_string(row, 0, ts.format(TIMESTAMP_FORMAT).to_string())?;
        for (col, cell) in grid.cells[row as usize - 1].iter().enumerate() {
            let col = (col + 1) as u16;
            match cell {
                CellValue::Number(n) => {
                    sheet.write_number(row, col, *n)?;
                }
                CellValue::Text(s) => {
                    sheet.write_string(row, col, s.as_str())?;
                }
                CellValue::Missing => {}
            }
        }
    }

    // fits "YYYY-MM-DD HH:MM:SS"
    sheet.set_column_width(0, 19)?;
    Ok(workbook)
}

/// Write the grid as a single-sheet spreadsheet, timestamps leftmost.
///
/// Parent directories are created as needed. A locked or unwritable
/// destination is reported as a `WriteError`; the caller leaves the input
/// unmarked so it is retried on the next poll cycle.
pub fn write_grid(grid: &TrendGrid, dest: &Path) -> Result<(), WriteError> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let mut workbook = build_workbook(grid).map_err(|source| WriteError::Save {
        path: dest.to_path_buf(),
        source,
    })?;
    workbook.save(dest).map_err(|source| WriteError::Save {
        path: dest.to_path_buf(),
        source,
    })
}
