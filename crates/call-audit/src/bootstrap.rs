use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the standard `~/.call-audit/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing
/// parents):
/// - `~/.call-audit/`
/// - `~/.call-audit/logs/`
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let audit_dir = home.join(".call-audit");
    std::fs::create_dir_all(&audit_dir)?;
    std::fs::create_dir_all(audit_dir.join("logs"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive.
/// The level names follow the historical operator scripts; unrecognised
/// names fall back to `"info"`.
///
/// The `log_file` parameter is accepted for forward-compatibility but file
/// logging is not yet wired – all output currently goes to stderr.
pub fn setup_logging(log_level: &str, _log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let upper = log_level.to_uppercase();
    let normalised = match upper.as_str() {
        "DEBUG" | "CRITICAL" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" => "error",
        other => other,
    };

    let filter = EnvFilter::try_new(normalised).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer().with_target(false).with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Locate a raw call batch when `--data-path` is not given.
///
/// Checks the following paths in order and returns the first that exists:
/// 1. `latest_calls_raw.json` in the working directory (the file the fetch
///    step writes)
/// 2. `calls/` in the working directory
/// 3. `~/.call-audit/calls/`
///
/// Returns `None` when none exists.
pub fn discover_data_path() -> Option<PathBuf> {
    let mut candidates = vec![
        PathBuf::from("latest_calls_raw.json"),
        PathBuf::from("calls"),
    ];
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".call-audit").join("calls"));
    }
    candidates.into_iter().find(|p| p.exists())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // HOME and the working directory are process-global, so the checks that
    // override them run inside one test body.
    #[test]
    fn test_directories_and_discovery() {
        let tmp = TempDir::new().expect("tempdir");

        let original_home = std::env::var_os("HOME");
        std::env::set_var("HOME", tmp.path());
        let original_cwd = std::env::current_dir().expect("cwd");
        std::env::set_current_dir(tmp.path()).expect("chdir");

        let ensure_result = ensure_directories();
        // No candidate exists yet.
        let before = discover_data_path();
        // Create the home-level candidate.
        let calls = tmp.path().join(".call-audit").join("calls");
        std::fs::create_dir_all(&calls).expect("create calls dir");
        let after = discover_data_path();

        std::env::set_current_dir(original_cwd).expect("chdir back");
        match original_home {
            Some(v) => std::env::set_var("HOME", v),
            None => std::env::remove_var("HOME"),
        }

        ensure_result.expect("ensure_directories should succeed");
        let audit_dir = tmp.path().join(".call-audit");
        assert!(audit_dir.is_dir(), ".call-audit dir must exist");
        assert!(audit_dir.join("logs").is_dir(), "logs subdir must exist");

        assert_eq!(before, None, "no candidate should be found yet");
        assert_eq!(after, Some(calls));
    }
}
