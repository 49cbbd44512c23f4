//! Report classification into outcomes

use genecheck_domain::Outcome;

/// Maps a terminal report to an outcome
///
/// Implementations never return [`Outcome::Failed`]; failure is reserved for
/// runs that terminate without a report.
pub trait ReportClassifier: Send + Sync {
    /// Classify the text following the terminal marker
    fn classify(&self, report: &str) -> Outcome;
}

/// Case-insensitive keyword matcher
///
/// Refutation terms are checked before support terms so a report like
/// "the pathway data does not support the claim" lands on Refuted rather
/// than Supported. Reports matching neither family are Inconclusive.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

const REFUTE_TERMS: &[&str] = &[
    "refut",
    "contradict",
    "not supported",
    "does not support",
    "unsupported",
    "incorrect",
    "no evidence",
];

const SUPPORT_TERMS: &[&str] = &[
    "support",
    "confirm",
    "verified",
    "corroborat",
    "consistent with",
];

impl ReportClassifier for KeywordClassifier {
    fn classify(&self, report: &str) -> Outcome {
        let report = report.to_lowercase();
        if REFUTE_TERMS.iter().any(|term| report.contains(term)) {
            Outcome::Refuted
        } else if SUPPORT_TERMS.iter().any(|term| report.contains(term)) {
            Outcome::Supported
        } else {
            Outcome::Inconclusive
        }
    }
}
