use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use glob::glob;

use crate::errors::FileError;
use crate::excel_writer::write_grid;
use crate::ledger::ProcessedLedger;
use crate::models::{TrendGrid, TrendRecord};
use crate::name_cleaner::clean_columns;
use crate::pivot::{dedup_records, pivot_records};
use crate::resampler::{infer_numeric_columns, resample_pad, RESAMPLE_STEP_MINUTES};
use crate::settings::Settings;
use crate::trend_parser::read_trend_file;

/// Trend export field separator.
pub const DELIMITER: u8 = b';';

/// Counts for one pass over the input directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct CycleOutcome {
    pub processed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Run the core transformation on parsed records: dedup, pivot, clean
/// column names, resample to the 15-minute grid, infer numeric columns.
pub fn convert_records(records: Vec<TrendRecord>) -> TrendGrid {
    let records = dedup_records(records);
    let grid = pivot_records(&records);
    let grid = clean_columns(grid);
    let mut grid = resample_pad(&grid, RESAMPLE_STEP_MINUTES);
    infer_numeric_columns(&mut grid);
    grid
}

/// Owns the settings and the run ledger and drives the poll loop.
pub struct TrendConverter {
    settings: Settings,
    ledger: ProcessedLedger,
}

impl TrendConverter {
    pub fn new(settings: Settings, ledger: ProcessedLedger) -> Self {
        Self { settings, ledger }
    }

    /// Destination for an input file: swap the trend prefix for the output
    /// prefix, lowercase the whole path, change `.csv` to `.xlsx`.
    pub fn output_path_for(&self, input: &str) -> PathBuf {
        let swapped = input.replacen(&self.settings.trend_path, &self.settings.output_path, 1);
        PathBuf::from(swapped.to_lowercase().replace(".csv", ".xlsx"))
    }

    /// Convert a single trend file end to end and return the output path.
    pub fn process_file(&self, input: &Path) -> Result<PathBuf, FileError> {
        let records = read_trend_file(input, DELIMITER)?;
        let grid = convert_records(records);
        let output = self.output_path_for(&input.to_string_lossy());
        write_grid(&grid, &output)?;
        Ok(output)
    }

    /// One pass over the input directory. A failing file is logged and
    /// skipped for this cycle; only an unusable input directory pattern is
    /// an error.
    pub fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let pattern = format!("{}/*.csv", self.settings.trend_path.trim_end_matches('/'));
        let matches = glob(&pattern)
            .with_context(|| format!("cannot scan trend folder with pattern {pattern}"))?;

        let mut outcome = CycleOutcome::default();
        for entry in matches {
            let input = match entry {
                Ok(path) => path,
                Err(e) => {
                    log::warn!("unreadable directory entry: {e}");
                    outcome.failed += 1;
                    continue;
                }
            };
            let key = input.to_string_lossy().to_string();
            if self.ledger.is_done(&key) {
                outcome.skipped += 1;
                continue;
            }

            match self.process_file(&input) {
                Ok(output) => {
                    if let Err(e) = self.ledger.mark_done(&key) {
                        log::warn!("{e}");
                    }
                    log::info!("{} has been processed", output.display());
                    outcome.processed += 1;
                }
                Err(FileError::Write(e)) => {
                    log::warn!("{e}; make sure the file is not open and the folder is not read-only");
                    outcome.failed += 1;
                }
                Err(FileError::Parse(e)) => {
                    log::warn!("skipping {}: {e}", input.display());
                    outcome.failed += 1;
                }
            }
        }

        Ok(outcome)
    }

    /// Poll forever: scan, convert, sleep. The stop flag makes the loop
    /// cancellable from another thread; the converter never sets it itself.
    pub fn run(&mut self, interval: Duration, stop: &AtomicBool) -> Result<()> {
        log::info!(
            "waiting for new CSV files in {}",
            self.settings.trend_path
        );
        while !stop.load(Ordering::Relaxed) {
            self.run_cycle()?;
            thread::sleep(interval);
        }
        log::info!("stop requested, poll loop finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;
    use std::fs;
    use tempfile::TempDir;

    const VALID_TREND: &str = "DateTime;Data Source;Value\n\
        2024-03-01 09:00:00;System:View.B1.AHU1.Temp;21.5\n\
        2024-03-01 09:00:00;System:View.B1.AHU1.Temp;99.9\n\
        2024-03-01 09:07:00;System:View.B1.AHU1.Temp;21.7\n\
        2024-03-01 09:20:00;System:View.B1.AHU1.Temp;21.9\n";

    fn converter_for(dir: &TempDir) -> TrendConverter {
        let trend_path = dir.path().join("trends");
        let output_path = dir.path().join("trends").join("excel");
        fs::create_dir_all(&trend_path).unwrap();
        let settings = Settings {
            trend_path: trend_path.to_string_lossy().to_string(),
            output_path: output_path.to_string_lossy().to_string(),
        };
        let ledger = ProcessedLedger::load(&dir.path().join("processed.json"));
        TrendConverter::new(settings, ledger)
    }

    fn write_input(converter: &TrendConverter, name: &str, content: &str) -> PathBuf {
        let path = PathBuf::from(&converter.settings.trend_path).join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn output_path_is_swapped_lowercased_and_rewritten() {
        let settings = Settings {
            trend_path: "c:/trends".to_string(),
            output_path: "c:/trends/excel".to_string(),
        };
        let dir = TempDir::new().unwrap();
        let ledger = ProcessedLedger::load(&dir.path().join("processed.json"));
        let converter = TrendConverter::new(settings, ledger);

        let out = converter.output_path_for("c:/trends/Export_AHU.CSV");
        assert_eq!(out, PathBuf::from("c:/trends/excel/export_ahu.xlsx"));
    }

    #[test]
    fn process_file_writes_spreadsheet() {
        let dir = TempDir::new().unwrap();
        let converter = converter_for(&dir);
        let input = write_input(&converter, "export.csv", VALID_TREND);

        let output = converter.process_file(&input).unwrap();
        assert!(output.exists());
        assert_eq!(output.extension().unwrap(), "xlsx");
    }

    #[test]
    fn cycle_marks_files_done_and_never_reprocesses_them() {
        let dir = TempDir::new().unwrap();
        let mut converter = converter_for(&dir);
        write_input(&converter, "export.csv", VALID_TREND);

        let first = converter.run_cycle().unwrap();
        assert_eq!(first.processed, 1);

        let second = converter.run_cycle().unwrap();
        assert_eq!(second.processed, 0);
        assert_eq!(second.skipped, 1);
    }

    #[test]
    fn one_malformed_file_does_not_block_the_others() {
        let dir = TempDir::new().unwrap();
        let mut converter = converter_for(&dir);
        write_input(&converter, "good_a.csv", VALID_TREND);
        write_input(
            &converter,
            "bad.csv",
            "DateTime;Data Source;Value\nnot-a-date;System:View.B1.AHU1.Temp;1\n",
        );
        write_input(&converter, "good_b.csv", VALID_TREND);

        let outcome = converter.run_cycle().unwrap();
        assert_eq!(outcome.processed, 2);
        assert_eq!(outcome.failed, 1);

        // the malformed file stays unmarked and is retried next cycle
        let retry = converter.run_cycle().unwrap();
        assert_eq!(retry.skipped, 2);
        assert_eq!(retry.failed, 1);
    }

    #[test]
    fn transformation_is_idempotent_at_grid_level() {
        let dir = TempDir::new().unwrap();
        let converter = converter_for(&dir);
        let input = write_input(&converter, "export.csv", VALID_TREND);

        let records = read_trend_file(&input, DELIMITER).unwrap();
        let first = convert_records(records.clone());
        let second = convert_records(records);
        assert_eq!(first, second);
    }

    #[test]
    fn converted_grid_matches_expected_shape_and_values() {
        let records = vec![
            TrendRecord {
                timestamp: chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap(),
                source: "System:ManagementView.Building1.Chiller2.Power".to_string(),
                value: "100.5".to_string(),
            },
            TrendRecord {
                timestamp: chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
                    .unwrap()
                    .and_hms_opt(9, 7, 0)
                    .unwrap(),
                source: "System:ManagementView.Building1.Chiller2.Power".to_string(),
                value: "101.0".to_string(),
            },
            TrendRecord {
                timestamp: chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap(),
                source: "abcd".to_string(),
                value: "1".to_string(),
            },
        ];

        let grid = convert_records(records);
        // short raw name dropped, long one cleaned
        assert_eq!(grid.columns, vec!["Chiller2"]);
        assert_eq!(grid.timestamps.len(), 1);
        assert_eq!(grid.cell(0, 0), &CellValue::Number(100.5));
    }
}
