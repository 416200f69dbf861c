use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Tool-name marker tables ───────────────────────────────────────────────────

/// Tool-name markers identifying a successful data capture.
/// Matched case-insensitively as substrings against tool-call names.
pub const DATA_SAVE_MARKERS: &[&str] = &["save", "confirmed", "protech"];

/// Tool-name markers identifying the agent-initiated hangup tool.
pub const END_CALL_MARKERS: &[&str] = &["end_call"];

/// Returns `true` when `name` contains any of `markers`, case-insensitively.
pub fn tool_name_matches(name: &str, markers: &[&str]) -> bool {
    let lower = name.to_lowercase();
    markers.iter().any(|marker| lower.contains(marker))
}

// ── ToolArgs ──────────────────────────────────────────────────────────────────

/// Argument payload of a tool invocation, in whatever shape the provider
/// delivered it: an already-parsed mapping or a JSON-encoded string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolArgs {
    Map(Map<String, Value>),
    Text(String),
}

impl Default for ToolArgs {
    fn default() -> Self {
        ToolArgs::Map(Map::new())
    }
}

impl ToolArgs {
    /// Best-effort argument mapping.
    ///
    /// A `Text` payload is JSON-decoded; when the decode fails or does not
    /// produce an object, `None` is returned and the caller keeps the raw
    /// string verbatim.
    pub fn parsed(&self) -> Option<Map<String, Value>> {
        match self {
            ToolArgs::Map(map) => Some(map.clone()),
            ToolArgs::Text(text) => serde_json::from_str::<Value>(text)
                .ok()
                .and_then(|v| v.as_object().cloned()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ToolArgs::Map(map) => map.is_empty(),
            ToolArgs::Text(text) => text.is_empty(),
        }
    }
}

// ── ToolCall ──────────────────────────────────────────────────────────────────

/// A structured function-invocation event emitted by the conversational agent
/// during a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Function name as reported by the provider; may be empty.
    #[serde(default)]
    pub name: String,
    /// Argument payload, shape-preserved.
    #[serde(default)]
    pub args: ToolArgs,
}

// ── CallRecord ────────────────────────────────────────────────────────────────

/// One outreach call, normalized from the provider's raw shape.
///
/// Built exactly once per raw call and never mutated; every field carries a
/// safe default, so a fully malformed input yields an all-default record
/// rather than an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallRecord {
    /// Provider call identifier.
    #[serde(default)]
    pub id: String,
    /// ISO-8601 creation timestamp string, or empty.
    #[serde(default)]
    pub created_at: String,
    /// Dialed customer number.
    #[serde(default)]
    pub phone: String,
    /// Lead company name. Empty means a non-campaign / manual record.
    #[serde(default)]
    pub company: String,
    /// Call duration in whole seconds; 0 when unknown.
    #[serde(default)]
    pub duration_seconds: u64,
    /// Raw provider ended-reason code.
    #[serde(default)]
    pub ended_reason: String,
    /// Full conversation transcript (`AI:` / `User:` prefixed lines).
    #[serde(default)]
    pub transcript: String,
    /// Provider-generated call summary.
    #[serde(default)]
    pub summary: String,
    /// Tool invocations in the order they occurred.
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

impl CallRecord {
    pub fn has_transcript(&self) -> bool {
        !self.transcript.is_empty()
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Daily histogram key: the date portion (first 10 characters) of
    /// `created_at`, or `"unknown"` when the timestamp is empty.
    pub fn day_key(&self) -> String {
        if self.created_at.is_empty() {
            "unknown".to_string()
        } else {
            self.created_at.chars().take(10).collect()
        }
    }

    /// Operator-facing label: the company, falling back to the dialed number.
    pub fn display_name(&self) -> &str {
        if self.company.is_empty() {
            &self.phone
        } else {
            &self.company
        }
    }

    /// True when the record belongs to the campaign. Manual or test calls
    /// carry no company name.
    pub fn is_campaign(&self) -> bool {
        !self.company.is_empty()
    }

    /// True when any tool call's name contains one of `markers`
    /// (case-insensitive substring).
    pub fn has_tool_matching(&self, markers: &[&str]) -> bool {
        self.tool_calls
            .iter()
            .any(|tc| tool_name_matches(&tc.name, markers))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
