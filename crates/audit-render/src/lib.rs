//! Report rendering for call-audit.
//!
//! Consumes the structured [`audit_data::analysis::CampaignReport`] and
//! produces operator-facing output. Only the plain-text renderer lives here
//! today; the structured report is the contract, so other renderers can be
//! added without touching the analysis crates.

pub mod text;

pub use text::render_text;
