use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the call-audit pipeline.
///
/// The analysis core itself has no fatal path: malformed records degrade to
/// defaults. Errors only arise from batch discovery, file I/O and
/// configuration.
#[derive(Error, Debug)]
pub enum AuditError {
    /// A batch file could not be opened or read from disk.
    #[error("Failed to read batch file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A batch file parsed but did not hold an array of call objects.
    #[error("Batch file {path} is not a JSON array of calls")]
    BatchShape { path: PathBuf },

    /// The given data path does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No batch files were found under the given directory.
    #[error("No batch files found in {0}")]
    NoBatchFiles(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the audit crates.
pub type Result<T> = std::result::Result<T, AuditError>;
