use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::LedgerError;

pub const LEDGER_FILE: &str = "./processed.json";

/// Persisted record of which input files have already been converted.
///
/// Entries map input path -> `true` and are never cleared. The file is
/// rewritten synchronously after every successful conversion, so a crash
/// loses at most the in-flight file's status.
#[derive(Debug)]
pub struct ProcessedLedger {
    path: PathBuf,
    entries: BTreeMap<String, bool>,
}

impl ProcessedLedger {
    /// Load the ledger, starting empty (with a warning) when the file is
    /// missing or unreadable.
    pub fn load(path: &Path) -> Self {
        let entries = match fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|text| {
                serde_json::from_str::<BTreeMap<String, bool>>(&text).map_err(anyhow::Error::from)
            }) {
            Ok(entries) => {
                log::info!("processed file found, {} files counted", entries.len());
                entries
            }
            Err(e) => {
                log::warn!("processed file not found, a new one will be generated ({e})");
                BTreeMap::new()
            }
        };

        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_done(&self, key: &str) -> bool {
        self.entries.get(key).copied().unwrap_or(false)
    }

    /// Mark a file done and persist immediately. On a persist failure the
    /// in-memory entry is kept, so the file is not reprocessed this run.
    pub fn mark_done(&mut self, key: &str) -> Result<(), LedgerError> {
        self.entries.insert(key.to_string(), true);
        self.persist()
    }

    fn persist(&self) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json).map_err(|source| LedgerError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
