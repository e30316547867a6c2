use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE: &str = "./Settings.json";

/// Converter configuration, persisted as `Settings.json` next to the binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "TrendPath")]
    pub trend_path: String,
    #[serde(rename = "OutputPath")]
    pub output_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trend_path: "c:/trends".to_string(),
            output_path: "c:/trends/excel".to_string(),
        }
    }
}

impl Settings {
    /// Load settings, or fall back to the defaults and persist them so
    /// subsequent runs see a consistent file. Never fails.
    pub fn load_or_init(path: &Path) -> Self {
        match fs::read_to_string(path).map_err(anyhow::Error::from).and_then(|text| {
            serde_json::from_str::<Settings>(&text).map_err(anyhow::Error::from)
        }) {
            Ok(settings) => {
                log::info!("settings file found");
                log::info!("path to the trends folder: {}", settings.trend_path);
                log::info!("path to the excel output folder: {}", settings.output_path);
                settings
            }
            Err(e) => {
                let settings = Settings::default();
                log::warn!("settings file not found, default settings will be used ({e})");
                log::warn!("path to the trends folder: {}", settings.trend_path);
                log::warn!("path to the excel output folder: {}", settings.output_path);
                if let Err(e) = settings.save(path) {
                    log::warn!("could not persist default settings to {}: {e}", path.display());
                }
                settings
            }
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
