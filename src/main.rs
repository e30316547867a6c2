use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::{Context, Result};
use env_logger::Env;

use trend_converter::{ProcessedLedger, Settings, TrendConverter, LEDGER_FILE, SETTINGS_FILE};

const POLL_INTERVAL: Duration = Duration::from_secs(10);

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // Settings.json and processed.json live next to the binary
    let exe = std::env::current_exe().context("cannot determine executable path")?;
    if let Some(dir) = exe.parent() {
        std::env::set_current_dir(dir)
            .with_context(|| format!("cannot change working directory to {}", dir.display()))?;
    }

    let settings = Settings::load_or_init(Path::new(SETTINGS_FILE));
    let ledger = ProcessedLedger::load(Path::new(LEDGER_FILE));

    let stop = AtomicBool::new(false);
    TrendConverter::new(settings, ledger).run(POLL_INTERVAL, &stop)
}
