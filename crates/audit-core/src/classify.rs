//! Ended-reason classification.
//!
//! Maps the provider's free-form ended-reason codes onto a small fixed
//! taxonomy via an ordered substring rule table. The table order is part of
//! the contract: some raw codes contain needles from more than one rule, and
//! historical reports depend on the first match winning.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed taxonomy for provider ended-reason codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndedCategory {
    CustomerHangup,
    AssistantHangup,
    SilenceTimeout,
    Voicemail,
    MaxDurationReached,
    NoAnswer,
    ProviderUnavailable,
    ConnectionFailed,
    Unknown,
}

impl EndedCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndedCategory::CustomerHangup => "customer-hangup",
            EndedCategory::AssistantHangup => "assistant-hangup",
            EndedCategory::SilenceTimeout => "silence-timeout",
            EndedCategory::Voicemail => "voicemail",
            EndedCategory::MaxDurationReached => "max-duration-reached",
            EndedCategory::NoAnswer => "no-answer",
            EndedCategory::ProviderUnavailable => "provider-unavailable",
            EndedCategory::ConnectionFailed => "connection-failed",
            EndedCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EndedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered classification rules. A raw code matches a rule when it contains
/// any of the rule's needles; the first matching rule wins.
const ENDED_REASON_RULES: &[(&[&str], EndedCategory)] = &[
    (&["customer-ended"], EndedCategory::CustomerHangup),
    (&["assistant-ended"], EndedCategory::AssistantHangup),
    (&["silence-timed-out"], EndedCategory::SilenceTimeout),
    (&["voicemail"], EndedCategory::Voicemail),
    (&["max-duration"], EndedCategory::MaxDurationReached),
    (&["customer-did-not-answer"], EndedCategory::NoAnswer),
    (&["503", "unavailable"], EndedCategory::ProviderUnavailable),
    (&["failed-to-connect"], EndedCategory::ConnectionFailed),
];

/// Classify a raw provider ended-reason code.
///
/// Unmatched and empty codes fall through to [`EndedCategory::Unknown`].
pub fn classify_ended_reason(raw: &str) -> EndedCategory {
    for (needles, category) in ENDED_REASON_RULES {
        if needles.iter().any(|needle| raw.contains(needle)) {
            return *category;
        }
    }
    EndedCategory::Unknown
}

// ── Tests ─────────────────────────────────────────────────────────────────────
