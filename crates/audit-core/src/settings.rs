use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Batch reporting for voice-call outreach campaigns
#[derive(Parser, Debug, Clone)]
#[command(
    name = "call-audit",
    about = "Batch reporting for voice-call outreach campaigns",
    version
)]
pub struct Settings {
    /// Batch file, or directory of batch files, holding raw call JSON arrays
    #[arg(long)]
    pub data_path: Option<String>,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub view: String,

    /// Minimum call duration (seconds) for the missed-capture report
    #[arg(long, default_value = "20")]
    pub min_capture_seconds: u64,

    /// Minimum call duration (seconds) for the interest report
    #[arg(long, default_value = "40")]
    pub min_interest_seconds: u64,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.call-audit/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_capture_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_interest_seconds: Option<u64>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    /// Uses `~/.call-audit/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".call-audit").join("last_used.json")
    }

    /// Load persisted params from the default path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load persisted params from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to the default path, creating parent
    /// directories if needed.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&Self::config_path())
    }

    /// Atomically write params to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the default config file if it exists.
    pub fn clear() -> Result<(), std::io::Error> {
        Self::clear_at(&Self::config_path())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());

        // Parse into the typed struct using the same args.
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::apply_debug_override(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // Merge last-used values for fields that were NOT explicitly set on
        // the command line (CLI always wins).
        // NOTE: clap stores the arg id using the *field name* (underscores),
        // not the long-flag spelling (hyphens).
        if !is_arg_explicitly_set(&matches, "data_path") && settings.data_path.is_none() {
            settings.data_path = last.data_path;
        }
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "min_capture_seconds") {
            if let Some(v) = last.min_capture_seconds {
                settings.min_capture_seconds = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "min_interest_seconds") {
            if let Some(v) = last.min_interest_seconds {
                settings.min_interest_seconds = v;
            }
        }

        settings = Self::apply_debug_override(settings);

        // Persist current settings for next run.
        let params = LastUsedParams::from(&settings);
        let _ = params.save_to(config_path);

        settings
    }

    /// `--debug` overrides the log level.
    fn apply_debug_override(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            data_path: s.data_path.clone(),
            view: Some(s.view.clone()),
            min_capture_seconds: Some(s.min_capture_seconds),
            min_interest_seconds: Some(s.min_interest_seconds),
        }
    }
}

// ── Helper: check if an arg was explicitly set on the command line ─────────────

fn is_arg_explicitly_set(matches: &clap::ArgMatches, id: &str) -> bool {
    matches
        .value_source(id)
        .map(|source| source == clap::parser::ValueSource::CommandLine)
        .unwrap_or(false)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
