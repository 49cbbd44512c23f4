//! Aggregated analysis record for one gene set

use crate::verdict::Verdict;

/// Completion status of an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStatus {
    /// Every claim resolved without a failed verdict
    Complete,
    /// At least one claim's verification failed
    Partial,
}

impl AnalysisStatus {
    /// Short label for logging and summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Complete => "complete",
            AnalysisStatus::Partial => "partial",
        }
    }
}

/// The per-gene-set record assembled once all claims resolve
///
/// Owned by the result aggregator; assembled exactly once per gene set.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// The gene set the analysis is about
    pub genes: Vec<String>,
    /// Name of the most prominent biological process, post-verification
    pub process_name: String,
    /// Narrative summary, post-verification
    pub summary: String,
    /// One verdict per verified claim, in claim order
    pub verdicts: Vec<Verdict>,
    /// `Complete` if no verdict failed, `Partial` otherwise
    pub status: AnalysisStatus,
}
