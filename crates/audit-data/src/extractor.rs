//! Tool-call extraction from a call's message log.

use audit_core::fields::FieldReader;
use audit_core::models::{ToolArgs, ToolCall};
use serde_json::Value;

/// Collect the tool-invocation events issued during a call, in the order
/// they appear in the message log.
///
/// Each message is visited exactly once and contributes iff its `toolCalls`
/// array is non-empty. Role tags are deliberately not a second predicate: a
/// message tagged `assistant` that also carries `toolCalls` yields its
/// entries once, never twice. Re-running on the same messages yields an
/// identical sequence.
pub fn extract_tool_calls(messages: &[Value]) -> Vec<ToolCall> {
    let mut tool_calls = Vec::new();

    for message in messages {
        for raw in FieldReader::new(message).seq("toolCalls") {
            let function = FieldReader::new(raw).at("function");
            tool_calls.push(ToolCall {
                name: function.str("name"),
                args: extract_args(&function),
            });
        }
    }

    tool_calls
}

/// Keep the argument payload in whatever shape it arrived: an object stays a
/// mapping, a string stays a string, anything else becomes an empty mapping.
fn extract_args(function: &FieldReader) -> ToolArgs {
    match function.get("arguments") {
        Value::Object(map) => ToolArgs::Map(map.clone()),
        Value::String(text) => ToolArgs::Text(text.clone()),
        _ => ToolArgs::default(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
