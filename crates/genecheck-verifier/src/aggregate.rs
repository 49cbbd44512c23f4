//! Verdict aggregation into per-gene-set analysis records

use genecheck_domain::{AnalysisResult, AnalysisStatus, Verdict};

/// Tally of verdict outcomes across one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    /// Claims the evidence corroborated
    pub supported: usize,
    /// Claims the evidence contradicted
    pub refuted: usize,
    /// Claims the evidence neither corroborated nor contradicted
    pub inconclusive: usize,
    /// Runs that failed before producing a classification
    pub failed: usize,
}

impl OutcomeCounts {
    /// Total verdicts tallied
    pub fn total(&self) -> usize {
        self.supported + self.refuted + self.inconclusive + self.failed
    }
}

/// Tally outcomes across a batch of verdicts
pub fn counts(verdicts: &[Verdict]) -> OutcomeCounts {
    use genecheck_domain::Outcome;

    let mut counts = OutcomeCounts::default();
    for verdict in verdicts {
        match verdict.outcome {
            Outcome::Supported => counts.supported += 1,
            Outcome::Refuted => counts.refuted += 1,
            Outcome::Inconclusive => counts.inconclusive += 1,
            Outcome::Failed(_) => counts.failed += 1,
        }
    }
    counts
}

/// Assemble the per-gene-set analysis record from resolved verdicts
///
/// The summary carries one line per verdict, labeled with its outcome, in
/// claim order. Status is `Complete` only when no verdict failed.
pub fn assemble(
    genes: Vec<String>,
    process_name: impl Into<String>,
    verdicts: Vec<Verdict>,
) -> AnalysisResult {
    let status = if verdicts.iter().any(|v| v.outcome.is_failed()) {
        AnalysisStatus::Partial
    } else {
        AnalysisStatus::Complete
    };

    let summary = verdicts
        .iter()
        .map(|v| format!("[{}] {}", v.outcome.label(), v.report_text))
        .collect::<Vec<_>>()
        .join("\n");

    AnalysisResult {
        genes,
        process_name: process_name.into(),
        summary,
        verdicts,
        status,
    }
}
