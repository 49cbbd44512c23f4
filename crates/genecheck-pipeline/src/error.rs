//! Error types for the annotation cascade

use genecheck_domain::traits::ModelError;
use thiserror::Error;

/// Errors that abort an annotation run
///
/// Unlike per-claim verification failures, which are absorbed into verdicts,
/// these surface to the caller: without a narrative or a claim list there is
/// nothing left to verify.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The reasoning model failed
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// The model requested a tool during a no-tool annotation step
    #[error("model requested a tool during annotation")]
    UnexpectedToolCall,

    /// The narrative is missing its `Process:` header
    #[error("annotation is missing its 'Process:' header")]
    MissingProcessHeader,

    /// The claim-list response could not be parsed
    #[error("invalid claim list: {0}")]
    InvalidClaimList(String),
}
