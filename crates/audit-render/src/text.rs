//! Plain-text rendering of the campaign report.
//!
//! Section order follows the historical operator report: batch totals,
//! per-day counts, durations, ended reasons, data-capture detail, then one
//! section per flagger and a closing summary.

use std::fmt::Write;

use audit_core::models::{tool_name_matches, CallRecord, ToolArgs, DATA_SAVE_MARKERS};
use audit_data::analysis::CampaignReport;

const RULE: &str =
    "======================================================================";
const SUBRULE: &str =
    "______________________________________________________________________";

/// Days shown in the per-day section.
const PER_DAY_LIMIT: usize = 15;
/// Maximum characters shown for an excerpt line.
const EXCERPT_CHARS: usize = 150;
/// Maximum characters shown for an unparsed argument payload.
const RAW_ARGS_CHARS: usize = 200;

/// Render the full report as operator-facing text.
pub fn render_text(report: &CampaignReport) -> String {
    let mut out = String::new();

    header(&mut out, report);
    per_day(&mut out, report);
    durations(&mut out, report);
    ended_reasons(&mut out, report);
    saved_data(&mut out, report);
    missed_captures(&mut out, report);
    interest(&mut out, report);
    repetitions(&mut out, report);
    pronunciation(&mut out, report);
    disclosure(&mut out, report);
    summary(&mut out, report);

    out
}

// ── Sections ──────────────────────────────────────────────────────────────────

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", RULE);
    let _ = writeln!(out, "  {}", title);
    let _ = writeln!(out, "{}", RULE);
}

fn header(out: &mut String, report: &CampaignReport) {
    let stats = &report.stats;
    section(out, "CALL CAMPAIGN REPORT");
    let _ = writeln!(out, "\nTotal calls: {}", stats.total);
    let _ = writeln!(out, "With transcript: {}", stats.with_transcript);
    let _ = writeln!(out, "With tool calls: {}", stats.with_tool_calls);
    let _ = writeln!(out, "  - data capture tool: {}", stats.data_saved);
    let _ = writeln!(out, "  - end_call tool: {}", stats.end_call_used);
}

fn per_day(out: &mut String, report: &CampaignReport) {
    if report.stats.per_day.is_empty() {
        return;
    }
    let _ = writeln!(out, "\nCalls per day:");
    // Most recent days first.
    for (day, count) in report.stats.per_day.iter().rev().take(PER_DAY_LIMIT) {
        let _ = writeln!(out, "  {}: {} calls", day, count);
    }
}

fn durations(out: &mut String, report: &CampaignReport) {
    let Some(duration) = &report.stats.duration else {
        return;
    };
    let _ = writeln!(out, "\nDuration (calls with transcript):");
    let _ = writeln!(out, "  Mean: {:.0}s", duration.mean_seconds);
    let _ = writeln!(out, "  Max: {}s", duration.max_seconds);
    let _ = writeln!(out, "  Min: {}s", duration.min_seconds);
    let _ = writeln!(out, "  >60s: {} calls", duration.over_sixty);
}

fn ended_reasons(out: &mut String, report: &CampaignReport) {
    let stats = &report.stats;
    if stats.ended_reasons.is_empty() {
        return;
    }

    let mut reasons: Vec<(&String, &usize)> = stats.ended_reasons.iter().collect();
    reasons.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let _ = writeln!(out, "\nEnded reasons:");
    for (reason, count) in reasons {
        let pct = if stats.total > 0 {
            *count as f64 / stats.total as f64 * 100.0
        } else {
            0.0
        };
        let _ = writeln!(out, "  {:<35} {:>4} ({:.1}%)", reason, count, pct);
    }
}

fn saved_data(out: &mut String, report: &CampaignReport) {
    section(out, "DATA CAPTURED");

    let saved: Vec<&CallRecord> = report
        .records
        .iter()
        .filter(|r| r.has_tool_matching(DATA_SAVE_MARKERS))
        .collect();

    if saved.is_empty() {
        let _ = writeln!(out, "\n  No call used the data-capture tool");
        return;
    }

    let _ = writeln!(out, "\nCalls with captured data ({}):", saved.len());
    for record in saved {
        let _ = writeln!(
            out,
            "\n  {} ({}, {}s)",
            record.display_name(),
            clip(&record.created_at, 16),
            record.duration_seconds
        );
        for tool_call in &record.tool_calls {
            if !tool_name_matches(&tool_call.name, DATA_SAVE_MARKERS) {
                continue;
            }
            match (tool_call.args.parsed(), &tool_call.args) {
                (Some(args), _) => {
                    let _ = writeln!(out, "    -> {}:", tool_call.name);
                    for (key, value) in &args {
                        if value.is_null() || value == "" {
                            continue;
                        }
                        let _ = writeln!(out, "       {}: {}", key, display_value(value));
                    }
                }
                (None, ToolArgs::Text(raw)) => {
                    // Unparseable payload: show the raw text verbatim.
                    let _ = writeln!(
                        out,
                        "    -> {}: {}",
                        tool_call.name,
                        clip(raw, RAW_ARGS_CHARS)
                    );
                }
                (None, ToolArgs::Map(_)) => {
                    let _ = writeln!(out, "    -> {}", tool_call.name);
                }
            }
        }
    }
}

fn missed_captures(out: &mut String, report: &CampaignReport) {
    section(out, "CONTACT DATA MENTIONED BUT NOT CAPTURED");

    let findings = &report.flags.missed_captures;
    if findings.is_empty() {
        let _ = writeln!(out, "\n  No calls with uncaptured contact-data keywords");
        return;
    }

    for (i, finding) in findings.iter().enumerate() {
        let _ = writeln!(
            out,
            "\n  #{} {} ({}, {}s)",
            i + 1,
            finding.call.label,
            clip(&finding.call.created_at, 16),
            finding.call.duration_seconds
        );
        let _ = writeln!(out, "     Keywords found: {}", finding.keywords.join(", "));
        for line in &finding.lines {
            let _ = writeln!(out, "     -> {}", clip(line, EXCERPT_CHARS));
        }
    }
}

fn interest(out: &mut String, report: &CampaignReport) {
    section(out, "INTEREST SHOWN");

    let findings = &report.flags.interest;
    if findings.is_empty() {
        let _ = writeln!(out, "\n  No calls with interest markers");
        return;
    }

    for finding in findings {
        let _ = writeln!(out, "\n{}", SUBRULE);
        let _ = writeln!(
            out,
            "{} | {}s | {} | Saved: {}",
            finding.call.label,
            finding.call.duration_seconds,
            clip(&finding.call.created_at, 10),
            if finding.data_saved { "YES" } else { "NO" }
        );
        let _ = writeln!(out, "  Markers: {}", finding.markers.join(", "));
        for line in &finding.lines {
            let _ = writeln!(out, "  {}", clip(line, EXCERPT_CHARS));
        }
    }
}

fn repetitions(out: &mut String, report: &CampaignReport) {
    section(out, "AGENT REPETITIONS");

    let findings = &report.flags.repetitive;
    let _ = writeln!(out, "\n  Calls with 2+ agent repetitions: {}", findings.len());
    for finding in findings {
        let _ = writeln!(
            out,
            "    {} ({}, {}s, {} repetitions)",
            finding.call.label,
            clip(&finding.call.created_at, 10),
            finding.call.duration_seconds,
            finding.repeats
        );
    }
}

fn pronunciation(out: &mut String, report: &CampaignReport) {
    section(out, "BRAND PRONUNCIATION ISSUES");
    let _ = writeln!(out);
    for count in &report.flags.mispronunciations {
        let _ = writeln!(out, "  '{}': {} calls", count.variant.trim_end(), count.calls);
    }
}

fn disclosure(out: &mut String, report: &CampaignReport) {
    section(out, "PROACTIVE AI SELF-DISCLOSURE");
    let _ = writeln!(
        out,
        "\n  Calls with AI self-disclosure: {}",
        report.flags.self_disclosures.len()
    );
}

fn summary(out: &mut String, report: &CampaignReport) {
    let stats = &report.stats;
    let flags = &report.flags;
    section(out, "SUMMARY");
    let _ = writeln!(out, "  Total calls: {}", stats.total);
    let _ = writeln!(out, "  With transcript: {}", stats.with_transcript);
    let _ = writeln!(out, "  Data captured: {}", stats.data_saved);
    let _ = writeln!(out, "  end_call used: {}", stats.end_call_used);
    let _ = writeln!(out, "  Repetitive (2+): {}", flags.repetitive.len());
    let _ = writeln!(out, "  AI self-disclosure: {}", flags.self_disclosures.len());
    let _ = writeln!(
        out,
        "  Data missed (keywords, not captured): {}",
        flags.missed_captures.len()
    );
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// First `max` characters of `s`.
fn clip(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Scalar values print bare; anything nested prints as compact JSON.
fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
