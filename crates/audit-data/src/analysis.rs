//! Top-level batch analysis pipeline.
//!
//! Orchestrates loading, normalization, aggregation and flagging, returning
//! a [`CampaignReport`] ready for any renderer. The structured report is the
//! interoperable contract: text, HTML or CSV output all layer on top of it
//! without touching this crate.

use std::path::Path;

use audit_core::error::Result;
use audit_core::models::CallRecord;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregator::CallStats;
use crate::flaggers::{
    brand_mispronunciations, interest_shown, missed_captures, repetitive_calls, self_disclosures,
    CallRef, CaptureFinding, InterestFinding, PronunciationCount, RepetitionFinding,
};
use crate::loader::load_raw_calls;
use crate::normalizer::normalize_call;

// ── Public types ──────────────────────────────────────────────────────────────

/// Thresholds for the duration-gated flaggers.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisConfig {
    /// Missed-capture gate in seconds.
    pub min_capture_seconds: u64,
    /// Interest gate in seconds. Historical reports ran with 30 and 40.
    pub min_interest_seconds: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_capture_seconds: 20,
            min_interest_seconds: 40,
        }
    }
}

/// Findings from every flagger, in report order.
#[derive(Debug, Clone, Serialize)]
pub struct FlagFindings {
    pub missed_captures: Vec<CaptureFinding>,
    pub interest: Vec<InterestFinding>,
    pub repetitive: Vec<RepetitionFinding>,
    pub mispronunciations: Vec<PronunciationCount>,
    pub self_disclosures: Vec<CallRef>,
}

/// Metadata produced alongside the report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// ISO-8601 timestamp when this report was generated.
    pub generated_at: String,
    /// Number of raw calls that entered normalization.
    pub records_processed: usize,
    /// Wall-clock seconds spent loading batch files.
    pub load_time_seconds: f64,
    /// Thresholds the flaggers ran with.
    pub config: AnalysisConfig,
}

/// The complete structured report over one batch.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignReport {
    pub records: Vec<CallRecord>,
    pub stats: CallStats,
    pub flags: FlagFindings,
    pub metadata: ReportMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Build a report from already-normalized records. Pure and infallible: any
/// batch, however empty or degenerate, yields a best-effort report.
pub fn build_report(records: Vec<CallRecord>, config: &AnalysisConfig) -> CampaignReport {
    let stats = CallStats::compute(&records);

    let flags = FlagFindings {
        missed_captures: missed_captures(&records, config.min_capture_seconds),
        interest: interest_shown(&records, config.min_interest_seconds),
        repetitive: repetitive_calls(&records),
        mispronunciations: brand_mispronunciations(&records),
        self_disclosures: self_disclosures(&records),
    };

    let metadata = ReportMetadata {
        generated_at: Utc::now().to_rfc3339(),
        records_processed: records.len(),
        load_time_seconds: 0.0,
        config: config.clone(),
    };

    CampaignReport {
        records,
        stats,
        flags,
        metadata,
    }
}

/// Run the full pipeline over the batch files under `data_path`.
///
/// 1. Load raw calls from disk.
/// 2. Normalize each into a [`CallRecord`].
/// 3. Aggregate statistics and run every flagger.
pub fn analyze_batch(data_path: &Path, config: &AnalysisConfig) -> Result<CampaignReport> {
    let load_start = std::time::Instant::now();
    let raw_calls = load_raw_calls(data_path)?;
    let load_time = load_start.elapsed().as_secs_f64();
    info!(
        "Loaded {} raw calls from {}",
        raw_calls.len(),
        data_path.display()
    );

    let records: Vec<CallRecord> = raw_calls.iter().map(normalize_call).collect();
    debug!("Normalized {} records", records.len());

    let mut report = build_report(records, config);
    report.metadata.load_time_seconds = load_time;
    Ok(report)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_call(id: &str, transcript: &str, duration: u64) -> serde_json::Value {
        json!({
            "id": id,
            "createdAt": "2026-02-02T16:05:46Z",
            "customer": {"number": "+34600111222"},
            "duration": duration,
            "endedReason": "customer-ended-call",
            "transcript": transcript,
            "messages": []
        })
    }

    // ── build_report ──────────────────────────────────────────────────────────

    #[test]
    fn test_build_report_empty_batch() {
        let report = build_report(Vec::new(), &AnalysisConfig::default());
        assert_eq!(report.stats.total, 0);
        assert!(report.records.is_empty());
        assert!(report.flags.missed_captures.is_empty());
        assert!(!report.metadata.generated_at.is_empty());
    }

    #[test]
    fn test_build_report_runs_all_flaggers() {
        let records = vec![crate::normalizer::normalize_call(&sample_call(
            "a",
            "AI: hola\nAI: hola\nAI: hola\nUser: mi email es a@b.es",
            45,
        ))];

        let report = build_report(records, &AnalysisConfig::default());
        assert_eq!(report.stats.total, 1);
        assert_eq!(report.flags.missed_captures.len(), 1);
        assert_eq!(report.flags.repetitive.len(), 1);
        // Mispronunciation counts exist for every variant even at zero.
        assert!(!report.flags.mispronunciations.is_empty());
    }

    #[test]
    fn test_build_report_threshold_config_respected() {
        let records = vec![crate::normalizer::normalize_call(&sample_call(
            "a",
            "User: mi email es a@b.es",
            25,
        ))];

        let strict = build_report(records.clone(), &AnalysisConfig {
            min_capture_seconds: 30,
            ..Default::default()
        });
        assert!(strict.flags.missed_captures.is_empty());

        let lax = build_report(records, &AnalysisConfig::default());
        assert_eq!(lax.flags.missed_captures.len(), 1);
    }

    #[test]
    fn test_report_serializes() {
        let report = build_report(Vec::new(), &AnalysisConfig::default());
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("stats").is_some());
        assert!(value.get("flags").is_some());
        assert!(value.get("metadata").is_some());
    }

    // ── analyze_batch ─────────────────────────────────────────────────────────

    #[test]
    fn test_analyze_batch_end_to_end() {
        let dir = TempDir::new().unwrap();
        let batch = json!([
            sample_call("a", "AI: buenos dias\nUser: no gracias", 15),
            sample_call("b", "", 0),
        ]);
        std::fs::write(
            dir.path().join("calls.json"),
            serde_json::to_string(&batch).unwrap(),
        )
        .unwrap();

        let report = analyze_batch(dir.path(), &AnalysisConfig::default()).unwrap();
        assert_eq!(report.stats.total, 2);
        assert_eq!(report.stats.with_transcript, 1);
        assert_eq!(report.metadata.records_processed, 2);
        assert!(report.metadata.load_time_seconds >= 0.0);
    }

    #[test]
    fn test_analyze_batch_missing_path_errors() {
        let err = analyze_batch(
            Path::new("/tmp/does-not-exist-call-audit-xyz"),
            &AnalysisConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Data path not found"));
    }
}
