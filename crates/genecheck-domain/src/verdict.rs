//! Verdicts: terminal artifacts of one claim's verification attempt

use crate::claim::ClaimId;
use crate::evidence::EvidenceLog;
use std::fmt;

/// Terminal classification of one claim's verification attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The report corroborates the claim
    Supported,
    /// The report explicitly contradicts the claim
    Refuted,
    /// The report neither corroborates nor contradicts the claim
    Inconclusive,
    /// The verification run itself failed; carries the originating error kind
    Failed(String),
}

impl Outcome {
    /// Whether the run failed before producing a classification
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Short label for logging and summaries
    pub fn label(&self) -> &str {
        match self {
            Outcome::Supported => "supported",
            Outcome::Refuted => "refuted",
            Outcome::Inconclusive => "inconclusive",
            Outcome::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Failed(reason) => write!(f, "failed ({})", reason),
            other => write!(f, "{}", other.label()),
        }
    }
}

/// Terminal artifact of one verification run; immutable once produced
///
/// Exactly one verdict is produced per claim attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// The claim this verdict is for
    pub claim_id: ClaimId,
    /// Classification of the run
    pub outcome: Outcome,
    /// Text following the terminal `Report:` marker; empty for failed runs
    pub report_text: String,
    /// Tool-call results accumulated during the run
    pub evidence: EvidenceLog,
}

impl Verdict {
    /// Create a verdict from a completed run
    pub fn new(
        claim_id: ClaimId,
        outcome: Outcome,
        report_text: impl Into<String>,
        evidence: EvidenceLog,
    ) -> Self {
        Self {
            claim_id,
            outcome,
            report_text: report_text.into(),
            evidence,
        }
    }

    /// Create a failed verdict carrying the originating error kind
    pub fn failed(claim_id: ClaimId, reason: impl Into<String>) -> Self {
        Self {
            claim_id,
            outcome: Outcome::Failed(reason.into()),
            report_text: String::new(),
            evidence: EvidenceLog::new(),
        }
    }
}
