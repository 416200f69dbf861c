//! Heuristic transcript flaggers.
//!
//! Each flagger is an independent pass over the normalized batch: none reads
//! another's output, and they can run in any order. Transcripts are
//! line-split text with `AI:` / `User:` speaker prefixes. These are
//! heuristics over noisy transcription output — occasional false positives
//! on legitimately similar lines are accepted.

use std::collections::HashSet;

use audit_core::models::{CallRecord, DATA_SAVE_MARKERS};
use serde::Serialize;

// ── Rule tables ───────────────────────────────────────────────────────────────

/// Contact-data keywords for the missed-capture report.
/// Matched as lowercase substrings over the whole transcript.
pub const CAPTURE_KEYWORDS: &[&str] = &[
    "email", "correo", "arroba", "telefono", "movil", "numero", "llamame", "envia",
];

/// Interest markers, matched against the customer's side of the conversation.
pub const INTEREST_MARKERS: &[&str] = &[
    "interesa", "cuéntame", "envía", "resumen", "vale", "sí,", "correo", "email",
];

/// Misspelled brand-name variants as the transcriber emits them. Matching is
/// case-sensitive; the trailing spaces keep the short forms from matching
/// inside the longer ones.
pub const BRAND_VARIANTS: &[&str] = &[
    "General Protection",
    "General Protector",
    "General Protective",
    "General Protec ",
    "General Protect ",
];

/// Self-identifying phrases, matched against the lowercased transcript.
pub const DISCLOSURE_PHRASES: &[&str] = &[
    "soy una asistente con inteligencia artificial",
    "soy una asistente virtual",
    "soy un asistente con inteligencia",
    "soy una ia",
    "soy inteligencia artificial",
];

/// Two consecutive AI lines are compared on their leading tokens only when
/// both exceed this many characters.
const SIMILARITY_MIN_CHARS: usize = 30;
/// Token-overlap ratio above which two long AI lines count as a repeat.
const SIMILARITY_THRESHOLD: f64 = 0.7;
/// Repeat count at which a call is flagged as repetitive.
const REPEAT_FLAG_THRESHOLD: u32 = 2;

// ── Finding types ─────────────────────────────────────────────────────────────

/// Reference to the call a finding belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct CallRef {
    pub id: String,
    /// Operator-facing label (company or phone).
    pub label: String,
    pub created_at: String,
    pub duration_seconds: u64,
}

impl CallRef {
    pub fn from_record(record: &CallRecord) -> Self {
        Self {
            id: record.id.clone(),
            label: record.display_name().to_string(),
            created_at: record.created_at.clone(),
            duration_seconds: record.duration_seconds,
        }
    }
}

/// A call whose transcript mentions contact data but ran no capture tool.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureFinding {
    pub call: CallRef,
    /// Keywords found in the transcript.
    pub keywords: Vec<String>,
    /// Trimmed transcript lines containing at least one matched keyword.
    pub lines: Vec<String>,
}

/// A call where the customer signalled interest.
#[derive(Debug, Clone, Serialize)]
pub struct InterestFinding {
    pub call: CallRef,
    /// Markers found in the customer lines.
    pub markers: Vec<String>,
    /// Customer lines containing at least one matched marker.
    pub lines: Vec<String>,
    /// Whether a data-capture tool ran during the call.
    pub data_saved: bool,
}

/// A call whose agent repeated itself.
#[derive(Debug, Clone, Serialize)]
pub struct RepetitionFinding {
    pub call: CallRef,
    pub repeats: u32,
}

/// Per-variant count of calls containing a misspelled brand name.
#[derive(Debug, Clone, Serialize)]
pub struct PronunciationCount {
    /// Raw variant text, trailing space included.
    pub variant: String,
    pub calls: usize,
}

// ── Missed capture ────────────────────────────────────────────────────────────

/// Calls that mention contact data, ran no data-capture tool, and lasted
/// longer than `min_duration_seconds`.
pub fn missed_captures(records: &[CallRecord], min_duration_seconds: u64) -> Vec<CaptureFinding> {
    let mut findings = Vec::new();

    for record in records {
        if !record.has_transcript() {
            continue;
        }

        let lower = record.transcript.to_lowercase();
        let keywords: Vec<String> = CAPTURE_KEYWORDS
            .iter()
            .filter(|kw| lower.contains(*kw))
            .map(|kw| kw.to_string())
            .collect();
        if keywords.is_empty() {
            continue;
        }
        if record.has_tool_matching(DATA_SAVE_MARKERS) {
            continue;
        }
        if record.duration_seconds <= min_duration_seconds {
            continue;
        }

        findings.push(CaptureFinding {
            call: CallRef::from_record(record),
            keywords,
            lines: matching_lines(&record.transcript, CAPTURE_KEYWORDS),
        });
    }

    findings
}

/// Trimmed transcript lines containing any of `needles` (lowercased match).
fn matching_lines(transcript: &str, needles: &[&str]) -> Vec<String> {
    transcript
        .lines()
        .filter(|line| {
            let lower = line.to_lowercase();
            needles.iter().any(|needle| lower.contains(needle))
        })
        .map(|line| line.trim().to_string())
        .collect()
}

// ── Interest shown ────────────────────────────────────────────────────────────

/// Calls longer than `min_duration_seconds` where the customer's lines
/// contain an interest marker.
pub fn interest_shown(records: &[CallRecord], min_duration_seconds: u64) -> Vec<InterestFinding> {
    let mut findings = Vec::new();

    for record in records {
        if !record.has_transcript() || record.duration_seconds <= min_duration_seconds {
            continue;
        }

        let user_lines: Vec<&str> = record
            .transcript
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with("User:"))
            .collect();
        let user_text = user_lines.join(" ").to_lowercase();

        let markers: Vec<String> = INTEREST_MARKERS
            .iter()
            .filter(|marker| user_text.contains(*marker))
            .map(|marker| marker.to_string())
            .collect();
        if markers.is_empty() {
            continue;
        }

        let lines: Vec<String> = user_lines
            .iter()
            .filter(|line| {
                let lower = line.to_lowercase();
                INTEREST_MARKERS.iter().any(|marker| lower.contains(marker))
            })
            .map(|line| line.to_string())
            .collect();

        findings.push(InterestFinding {
            call: CallRef::from_record(record),
            markers,
            lines,
            data_saved: record.has_tool_matching(DATA_SAVE_MARKERS),
        });
    }

    findings
}

// ── Repetition ────────────────────────────────────────────────────────────────

/// Count agent repeats in a transcript.
///
/// Walks consecutive trimmed `AI:` lines; the counter increments when two
/// neighbours are identical, or when both exceed 30 characters and their
/// first-10-token overlap exceeds 0.7.
pub fn ai_repeat_count(transcript: &str) -> u32 {
    let ai_lines: Vec<&str> = transcript
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("AI:"))
        .collect();

    let mut repeats = 0u32;
    for pair in ai_lines.windows(2) {
        let (previous, current) = (pair[0], pair[1]);
        if current == previous {
            repeats += 1;
        } else if current.chars().count() > SIMILARITY_MIN_CHARS
            && previous.chars().count() > SIMILARITY_MIN_CHARS
            && leading_token_overlap(previous, current) > SIMILARITY_THRESHOLD
        {
            repeats += 1;
        }
    }
    repeats
}

/// Overlap between the first 10 whitespace tokens of two lines, relative to
/// the later line's token set. The denominator is floored at 1.
fn leading_token_overlap(earlier: &str, later: &str) -> f64 {
    let earlier_tokens: HashSet<String> = leading_tokens(earlier);
    let later_tokens: HashSet<String> = leading_tokens(later);

    let intersection = later_tokens.intersection(&earlier_tokens).count();
    intersection as f64 / later_tokens.len().max(1) as f64
}

fn leading_tokens(line: &str) -> HashSet<String> {
    line.to_lowercase()
        .split_whitespace()
        .take(10)
        .map(String::from)
        .collect()
}

/// Calls whose agent repeat counter reached the flag threshold.
pub fn repetitive_calls(records: &[CallRecord]) -> Vec<RepetitionFinding> {
    records
        .iter()
        .filter(|record| record.has_transcript())
        .filter_map(|record| {
            let repeats = ai_repeat_count(&record.transcript);
            (repeats >= REPEAT_FLAG_THRESHOLD).then(|| RepetitionFinding {
                call: CallRef::from_record(record),
                repeats,
            })
        })
        .collect()
}

// ── Mispronunciation ──────────────────────────────────────────────────────────

/// Per-variant counts of calls whose transcript contains a misspelled brand
/// name. Case-sensitive, as transcribed.
pub fn brand_mispronunciations(records: &[CallRecord]) -> Vec<PronunciationCount> {
    BRAND_VARIANTS
        .iter()
        .map(|variant| PronunciationCount {
            variant: variant.to_string(),
            calls: records
                .iter()
                .filter(|record| record.transcript.contains(variant))
                .count(),
        })
        .collect()
}

// ── Self-disclosure ───────────────────────────────────────────────────────────

/// Calls where the agent identified itself as an AI. One finding per call,
/// however many phrases matched or how often they repeated.
pub fn self_disclosures(records: &[CallRecord]) -> Vec<CallRef> {
    records
        .iter()
        .filter(|record| record.has_transcript())
        .filter(|record| {
            let lower = record.transcript.to_lowercase();
            DISCLOSURE_PHRASES.iter().any(|phrase| lower.contains(phrase))
        })
        .map(CallRef::from_record)
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
