//! Batch statistics over normalized call records.

use std::collections::BTreeMap;

use audit_core::classify::classify_ended_reason;
use audit_core::models::{CallRecord, DATA_SAVE_MARKERS, END_CALL_MARKERS};
use serde::Serialize;

// ── DurationStats ─────────────────────────────────────────────────────────────

/// Duration statistics over calls that actually connected: non-empty
/// transcript and a positive duration. Records failing either condition are
/// excluded, not counted as zero.
#[derive(Debug, Clone, Serialize)]
pub struct DurationStats {
    pub mean_seconds: f64,
    pub max_seconds: u64,
    pub min_seconds: u64,
    /// Qualifying calls longer than one minute.
    pub over_sixty: usize,
}

// ── CallStats ─────────────────────────────────────────────────────────────────

/// Aggregate statistics over one normalized batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CallStats {
    pub total: usize,
    pub with_transcript: usize,
    pub with_tool_calls: usize,
    /// Calls where a data-capture tool ran.
    pub data_saved: usize,
    /// Calls where the agent used its hangup tool.
    pub end_call_used: usize,
    /// Calls per day, keyed by the date portion of the creation timestamp
    /// (`"unknown"` for calls without one).
    pub per_day: BTreeMap<String, usize>,
    /// `None` when no call qualifies for duration statistics.
    pub duration: Option<DurationStats>,
    /// Ended-reason histogram, keyed by taxonomy category slug.
    pub ended_reasons: BTreeMap<String, usize>,
}

impl CallStats {
    /// Compute statistics over a normalized batch.
    pub fn compute(records: &[CallRecord]) -> CallStats {
        let mut stats = CallStats {
            total: records.len(),
            ..Default::default()
        };

        for record in records {
            if record.has_transcript() {
                stats.with_transcript += 1;
            }
            if record.has_tool_calls() {
                stats.with_tool_calls += 1;
            }
            if record.has_tool_matching(DATA_SAVE_MARKERS) {
                stats.data_saved += 1;
            }
            if record.has_tool_matching(END_CALL_MARKERS) {
                stats.end_call_used += 1;
            }

            *stats.per_day.entry(record.day_key()).or_insert(0) += 1;

            let category = classify_ended_reason(&record.ended_reason);
            *stats
                .ended_reasons
                .entry(category.as_str().to_string())
                .or_insert(0) += 1;
        }

        stats.duration = Self::duration_stats(records);
        stats
    }

    /// Mean/max/min over qualifying records only.
    fn duration_stats(records: &[CallRecord]) -> Option<DurationStats> {
        let durations: Vec<u64> = records
            .iter()
            .filter(|r| r.has_transcript() && r.duration_seconds > 0)
            .map(|r| r.duration_seconds)
            .collect();

        if durations.is_empty() {
            return None;
        }

        let sum: u64 = durations.iter().sum();
        Some(DurationStats {
            mean_seconds: sum as f64 / durations.len() as f64,
            max_seconds: durations.iter().copied().max().unwrap_or(0),
            min_seconds: durations.iter().copied().min().unwrap_or(0),
            over_sixty: durations.iter().filter(|&&d| d > 60).count(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
