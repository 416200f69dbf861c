mod bootstrap;

use std::path::PathBuf;

use anyhow::{bail, Result};
use audit_core::settings::Settings;
use audit_data::analysis::{analyze_batch, AnalysisConfig};
use audit_render::render_text;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("call-audit v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, capture gate: {}s, interest gate: {}s",
        settings.view,
        settings.min_capture_seconds,
        settings.min_interest_seconds
    );

    let data_path = settings
        .data_path
        .clone()
        .map(PathBuf::from)
        .or_else(bootstrap::discover_data_path);
    let Some(data_path) = data_path else {
        bail!(
            "no call batch found: pass --data-path, or place latest_calls_raw.json \
             or a calls/ directory in the working directory"
        );
    };

    let config = AnalysisConfig {
        min_capture_seconds: settings.min_capture_seconds,
        min_interest_seconds: settings.min_interest_seconds,
    };

    let report = analyze_batch(&data_path, &config)?;
    tracing::info!(
        "Report built: {} calls, {} findings flagged for missed capture",
        report.stats.total,
        report.flags.missed_captures.len()
    );

    match settings.view.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print!("{}", render_text(&report)),
    }

    Ok(())
}
