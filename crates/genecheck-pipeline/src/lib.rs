//! GeneCheck Annotation Cascade
//!
//! Drives the full gene-set annotation flow: a baseline narrative from the
//! reasoning model, claim generation over that narrative, verification of
//! every claim through the verifier, and report-driven revision of the
//! narrative, ending in one [`AnalysisResult`] per gene set.
//!
//! # Flow
//!
//! ```text
//! genes → baseline narrative ("Process: <name>" header)
//!       → topic claims     → BatchRunner → verdicts ┐
//!       → revised narrative (modification prompt)   │
//!       → analysis claims  → BatchRunner → verdicts ┤
//!       → final narrative  (summarization prompt)   │
//!       → AnalysisResult  ←───────────────────────── ┘
//! ```
//!
//! [`AnalysisResult`]: genecheck_domain::AnalysisResult

#![warn(missing_docs)]

mod cascade;
mod error;
pub mod parser;
pub mod prompts;

pub use cascade::Cascade;
pub use error::PipelineError;
