pub mod converter;
pub mod errors;
pub mod excel_writer;
pub mod ledger;
pub mod models;
pub mod name_cleaner;
pub mod pivot;
pub mod resampler;
pub mod settings;
pub mod trend_parser;

pub use converter::{convert_records, CycleOutcome, TrendConverter, DELIMITER};
pub use errors::{FileError, LedgerError, ParseError, WriteError};
pub use ledger::{ProcessedLedger, LEDGER_FILE};
pub use models::{CellValue, TrendGrid, TrendRecord};
pub use settings::{Settings, SETTINGS_FILE};
