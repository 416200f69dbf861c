//! Tolerant field access over raw provider JSON.
//!
//! The voice provider's call objects are not contractually stable
//! field-by-field: keys come and go, nested objects arrive as `null`, and
//! some payloads are JSON-encoded strings. Every read of a raw call goes
//! through [`FieldReader`], which substitutes a default instead of failing,
//! so a partially populated call can never abort the batch.

use chrono::{DateTime, Utc};
use serde_json::Value;

static NULL: Value = Value::Null;

/// Cursor over a raw JSON value with default-substituting accessors.
///
/// Lookups on absent or mis-shaped fields land on JSON null, from which every
/// typed accessor returns its default. This makes deep chains safe:
///
/// ```
/// use audit_core::fields::FieldReader;
/// use serde_json::json;
///
/// let call = json!({"customer": null});
/// let reader = FieldReader::new(&call);
/// assert_eq!(reader.at("customer").str("number"), "");
/// assert_eq!(reader.at("missing").at("deeper").u64("duration"), 0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FieldReader<'a> {
    data: &'a Value,
}

impl<'a> FieldReader<'a> {
    pub fn new(data: &'a Value) -> Self {
        Self { data }
    }

    /// Raw value under `key`; JSON null when absent or the parent is not an
    /// object.
    pub fn get(&self, key: &str) -> &'a Value {
        self.data.get(key).unwrap_or(&NULL)
    }

    /// Descend into the value under `key`.
    pub fn at(&self, key: &str) -> FieldReader<'a> {
        FieldReader::new(self.get(key))
    }

    /// String under `key`, or `""` when absent, null, or not a string.
    pub fn str(&self, key: &str) -> String {
        self.get(key).as_str().unwrap_or_default().to_string()
    }

    /// Non-negative integer under `key`, or `0`.
    ///
    /// The provider occasionally reports durations as floats; finite positive
    /// values are rounded, everything else defaults.
    pub fn u64(&self, key: &str) -> u64 {
        let value = self.get(key);
        if let Some(n) = value.as_u64() {
            n
        } else if let Some(f) = value.as_f64() {
            if f.is_finite() && f > 0.0 {
                f.round() as u64
            } else {
                0
            }
        } else {
            0
        }
    }

    /// Array under `key`, or an empty slice.
    pub fn seq(&self, key: &str) -> &'a [Value] {
        self.get(key).as_array().map(Vec::as_slice).unwrap_or(&[])
    }

    /// RFC 3339 timestamp under `key`, when present and well-formed.
    pub fn rfc3339(&self, key: &str) -> Option<DateTime<Utc>> {
        let s = self.get(key).as_str()?;
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
