//! Raw call → [`CallRecord`] normalization.
//!
//! One record per raw call, no error path: missing, null, or mis-shaped
//! fields become defaults, so the worst case for a fully malformed input is
//! an all-default record.

use audit_core::fields::FieldReader;
use audit_core::models::CallRecord;
use serde_json::Value;

use crate::extractor::extract_tool_calls;

/// Map one raw provider call object onto a [`CallRecord`].
pub fn normalize_call(raw: &Value) -> CallRecord {
    let call = FieldReader::new(raw);

    CallRecord {
        id: call.str("id"),
        created_at: call.str("createdAt"),
        phone: call.at("customer").str("number"),
        company: resolve_company(&call),
        duration_seconds: resolve_duration(&call),
        ended_reason: call.str("endedReason"),
        transcript: call.str("transcript"),
        summary: call.at("analysis").str("summary"),
        tool_calls: extract_tool_calls(call.seq("messages")),
    }
}

/// Company resolution order: the campaign variable override first, then the
/// lead metadata written by the dialer workflow. First non-empty wins.
fn resolve_company(call: &FieldReader) -> String {
    let from_overrides = call
        .at("assistantOverrides")
        .at("variableValues")
        .str("empresa");
    if !from_overrides.is_empty() {
        return from_overrides;
    }

    let metadata = call.at("metadata");
    let from_metadata = metadata.str("empresa");
    if !from_metadata.is_empty() {
        return from_metadata;
    }
    metadata.str("lead_name")
}

/// Call duration in whole seconds.
///
/// Prefers the provider's `duration` field; when that is absent or zero,
/// derives the duration from `startedAt`/`endedAt` instead. Calls that never
/// connected keep 0.
fn resolve_duration(call: &FieldReader) -> u64 {
    let reported = call.u64("duration");
    if reported > 0 {
        return reported;
    }

    match (call.rfc3339("startedAt"), call.rfc3339("endedAt")) {
        (Some(started), Some(ended)) if ended > started => {
            let millis = (ended - started).num_milliseconds();
            (millis as f64 / 1000.0).round() as u64
        }
        _ => 0,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fully_populated_call() {
        let raw = json!({
            "id": "call-123",
            "createdAt": "2026-02-02T16:05:46Z",
            "customer": {"number": "+34600111222"},
            "assistantOverrides": {"variableValues": {"empresa": "Talleres Ruiz"}},
            "duration": 72,
            "endedReason": "customer-ended-call",
            "transcript": "AI: Buenos dias\nUser: Hola",
            "analysis": {"summary": "Customer asked for an email."},
            "messages": [
                {"role": "assistant", "toolCalls": [
                    {"function": {"name": "save_confirmed_data", "arguments": {"email": "a@b.es"}}}
                ]}
            ]
        });

        let record = normalize_call(&raw);
        assert_eq!(record.id, "call-123");
        assert_eq!(record.created_at, "2026-02-02T16:05:46Z");
        assert_eq!(record.phone, "+34600111222");
        assert_eq!(record.company, "Talleres Ruiz");
        assert_eq!(record.duration_seconds, 72);
        assert_eq!(record.ended_reason, "customer-ended-call");
        assert_eq!(record.summary, "Customer asked for an email.");
        assert_eq!(record.tool_calls.len(), 1);
        assert_eq!(record.tool_calls[0].name, "save_confirmed_data");
    }

    #[test]
    fn test_empty_object_yields_all_defaults() {
        let record = normalize_call(&json!({}));
        assert_eq!(record.id, "");
        assert_eq!(record.created_at, "");
        assert_eq!(record.phone, "");
        assert_eq!(record.company, "");
        assert_eq!(record.duration_seconds, 0);
        assert_eq!(record.ended_reason, "");
        assert_eq!(record.transcript, "");
        assert_eq!(record.summary, "");
        assert!(record.tool_calls.is_empty());
    }

    #[test]
    fn test_null_nested_objects_yield_defaults() {
        let raw = json!({
            "customer": null,
            "assistantOverrides": null,
            "analysis": null,
            "messages": null,
            "duration": null,
            "transcript": null
        });

        let record = normalize_call(&raw);
        assert_eq!(record.phone, "");
        assert_eq!(record.company, "");
        assert_eq!(record.duration_seconds, 0);
        assert!(record.tool_calls.is_empty());
    }

    // ── Company resolution ────────────────────────────────────────────────────

    #[test]
    fn test_company_prefers_variable_override() {
        let raw = json!({
            "assistantOverrides": {"variableValues": {"empresa": "Override SL"}},
            "metadata": {"empresa": "Metadata SL", "lead_name": "Lead SL"}
        });
        assert_eq!(normalize_call(&raw).company, "Override SL");
    }

    #[test]
    fn test_company_falls_back_to_metadata_empresa() {
        let raw = json!({
            "assistantOverrides": {"variableValues": {"empresa": ""}},
            "metadata": {"empresa": "Metadata SL", "lead_name": "Lead SL"}
        });
        assert_eq!(normalize_call(&raw).company, "Metadata SL");
    }

    #[test]
    fn test_company_falls_back_to_lead_name() {
        let raw = json!({
            "metadata": {"lead_name": "Lead SL"}
        });
        assert_eq!(normalize_call(&raw).company, "Lead SL");
    }

    // ── Duration resolution ───────────────────────────────────────────────────

    #[test]
    fn test_duration_derived_from_timestamps_when_missing() {
        let raw = json!({
            "startedAt": "2026-02-02T16:05:00Z",
            "endedAt": "2026-02-02T16:05:42Z"
        });
        assert_eq!(normalize_call(&raw).duration_seconds, 42);
    }

    #[test]
    fn test_duration_field_wins_over_timestamps() {
        let raw = json!({
            "duration": 10,
            "startedAt": "2026-02-02T16:05:00Z",
            "endedAt": "2026-02-02T16:06:00Z"
        });
        assert_eq!(normalize_call(&raw).duration_seconds, 10);
    }

    #[test]
    fn test_duration_zero_without_timestamps_stays_zero() {
        let raw = json!({"duration": 0});
        assert_eq!(normalize_call(&raw).duration_seconds, 0);
    }

    #[test]
    fn test_duration_inverted_timestamps_stay_zero() {
        let raw = json!({
            "startedAt": "2026-02-02T16:06:00Z",
            "endedAt": "2026-02-02T16:05:00Z"
        });
        assert_eq!(normalize_call(&raw).duration_seconds, 0);
    }
}
