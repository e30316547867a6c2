use std::path::PathBuf;
use thiserror::Error;

/// A trend file that cannot be parsed. The file is skipped for the current
/// poll cycle, left unmarked in the ledger, and retried on the next one.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("required column `{0}` not found in header")]
    MissingColumn(String),

    #[error("unparsable timestamp `{value}` on line {line}")]
    BadTimestamp { value: String, line: usize },
}

/// Output spreadsheet could not be written. Non-fatal: the input stays
/// unmarked and is retried on the next cycle.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to save {path}: {source}")]
    Save {
        path: PathBuf,
        source: rust_xlsxwriter::XlsxError,
    },
}

/// Ledger persistence failure. The in-memory ledger is still updated, so the
/// current run will not reprocess the file; only a restart would.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to write ledger {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize ledger: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-file failure surfaced by a poll cycle.
#[derive(Debug, Error)]
pub enum FileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Write(#[from] WriteError),
}
