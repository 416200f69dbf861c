//! Batch discovery and loading for call-audit.
//!
//! Reads raw call batches exported from the voice provider — JSON files each
//! holding an array of call objects — and returns the calls as loose
//! [`serde_json::Value`]s for the normalizer.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use audit_core::error::{AuditError, Result};
use audit_core::fields::FieldReader;
use serde_json::Value;
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.json` batch files recursively under `data_path`, sorted by
/// path. A direct file path is returned as a single-element list.
pub fn find_batch_files(data_path: &Path) -> Vec<PathBuf> {
    if data_path.is_file() {
        return vec![data_path.to_path_buf()];
    }
    if !data_path.exists() {
        warn!("Data path does not exist: {}", data_path.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "json")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Load every raw call from the batch files under `data_path`.
///
/// Each file must hold a JSON array of call objects. Files that fail to read
/// or parse are logged and skipped; mis-shaped members inside a valid array
/// are kept (the normalizer defaults them). Calls whose non-empty `id` was
/// already seen in an earlier file are dropped, so overlapping export
/// snapshots do not double-count.
pub fn load_raw_calls(data_path: &Path) -> Result<Vec<Value>> {
    if !data_path.exists() {
        return Err(AuditError::DataPathNotFound(data_path.to_path_buf()));
    }

    let files = find_batch_files(data_path);
    if files.is_empty() {
        return Err(AuditError::NoBatchFiles(data_path.to_path_buf()));
    }

    let mut calls: Vec<Value> = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for file_path in &files {
        match load_single_batch(file_path) {
            Ok(batch) => {
                let total = batch.len();
                let mut kept = 0usize;
                for call in batch {
                    let id = FieldReader::new(&call).str("id");
                    if !id.is_empty() && !seen_ids.insert(id) {
                        continue;
                    }
                    kept += 1;
                    calls.push(call);
                }
                debug!(
                    "Batch {}: {} calls read, {} kept",
                    file_path.display(),
                    total,
                    kept
                );
            }
            Err(e) => {
                warn!("Skipping batch {}: {}", file_path.display(), e);
            }
        }
    }

    Ok(calls)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Read and parse one batch file into its array of call values.
fn load_single_batch(path: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path).map_err(|source| AuditError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_json::from_str(&content)?;
    match value {
        Value::Array(batch) => Ok(batch),
        _ => Err(AuditError::BatchShape {
            path: path.to_path_buf(),
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_batch(dir: &Path, name: &str, calls: &Value) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, serde_json::to_string(calls).unwrap()).unwrap();
        path
    }

    // ── find_batch_files ──────────────────────────────────────────────────────

    #[test]
    fn test_find_batch_files_flat_dir() {
        let dir = TempDir::new().unwrap();
        write_batch(dir.path(), "a.json", &json!([]));
        write_batch(dir.path(), "b.json", &json!([]));

        let files = find_batch_files(dir.path());
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_find_batch_files_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("february");
        std::fs::create_dir_all(&sub).unwrap();
        write_batch(dir.path(), "b.json", &json!([]));
        write_batch(&sub, "a.json", &json!([]));
        // Non-json files are ignored.
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let files = find_batch_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_find_batch_files_direct_file() {
        let dir = TempDir::new().unwrap();
        let path = write_batch(dir.path(), "calls.json", &json!([]));

        let files = find_batch_files(&path);
        assert_eq!(files, vec![path]);
    }

    #[test]
    fn test_find_batch_files_nonexistent_path() {
        assert!(find_batch_files(Path::new("/tmp/does-not-exist-call-audit-xyz")).is_empty());
    }

    // ── load_raw_calls ────────────────────────────────────────────────────────

    #[test]
    fn test_load_raw_calls_basic() {
        let dir = TempDir::new().unwrap();
        write_batch(
            dir.path(),
            "calls.json",
            &json!([{"id": "a"}, {"id": "b"}]),
        );

        let calls = load_raw_calls(dir.path()).unwrap();
        assert_eq!(calls.len(), 2);
    }

    #[test]
    fn test_load_raw_calls_dedups_across_files() {
        let dir = TempDir::new().unwrap();
        write_batch(dir.path(), "one.json", &json!([{"id": "a"}, {"id": "b"}]));
        write_batch(dir.path(), "two.json", &json!([{"id": "b"}, {"id": "c"}]));

        let calls = load_raw_calls(dir.path()).unwrap();
        assert_eq!(calls.len(), 3);
    }

    #[test]
    fn test_load_raw_calls_keeps_empty_id_duplicates() {
        // Calls without an id cannot be deduplicated and are all kept.
        let dir = TempDir::new().unwrap();
        write_batch(dir.path(), "calls.json", &json!([{}, {}, {"id": ""}]));

        let calls = load_raw_calls(dir.path()).unwrap();
        assert_eq!(calls.len(), 3);
    }

    #[test]
    fn test_load_raw_calls_skips_malformed_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{not json{{").unwrap();
        write_batch(dir.path(), "good.json", &json!([{"id": "a"}]));

        let calls = load_raw_calls(dir.path()).unwrap();
        assert_eq!(calls.len(), 1);
    }

    #[test]
    fn test_load_raw_calls_skips_non_array_file() {
        let dir = TempDir::new().unwrap();
        write_batch(dir.path(), "object.json", &json!({"calls": []}));
        write_batch(dir.path(), "good.json", &json!([{"id": "a"}]));

        let calls = load_raw_calls(dir.path()).unwrap();
        assert_eq!(calls.len(), 1);
    }

    #[test]
    fn test_load_raw_calls_missing_path_errors() {
        let err = load_raw_calls(Path::new("/tmp/does-not-exist-call-audit-xyz")).unwrap_err();
        assert!(matches!(err, AuditError::DataPathNotFound(_)));
    }

    #[test]
    fn test_load_raw_calls_empty_dir_errors() {
        let dir = TempDir::new().unwrap();
        let err = load_raw_calls(dir.path()).unwrap_err();
        assert!(matches!(err, AuditError::NoBatchFiles(_)));
    }
}
