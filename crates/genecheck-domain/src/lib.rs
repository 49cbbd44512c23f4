//! GeneCheck Domain Layer
//!
//! This crate contains the shared data model for GeneCheck: the claims being
//! verified, the conversation exchanged with the reasoning model, the evidence
//! accumulated from knowledge-source tool calls, and the terminal verdicts.
//!
//! ## Key Concepts
//!
//! - **Claim**: an atomic biological assertion about a gene set awaiting
//!   verification
//! - **Evidence**: accumulated tool-call results backing a verdict; append-only
//! - **Verdict**: the terminal classification of one claim's verification
//!   attempt
//! - **AnalysisResult**: the per-gene-set record assembled once all claims
//!   resolve
//!
//! ## Architecture
//!
//! Infrastructure implementations (reasoning-model providers, knowledge-source
//! adapters) live in other crates and plug in through the traits defined in
//! [`traits`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod claim;
pub mod conversation;
pub mod evidence;
pub mod traits;
pub mod verdict;

// Re-exports for convenience
pub use analysis::{AnalysisResult, AnalysisStatus};
pub use claim::{Claim, ClaimId};
pub use conversation::{AssistantTurn, Message, ParamType, ParameterSchema, Role, ToolSpec};
pub use evidence::{EvidenceLog, ToolCallRequest, ToolCallResult, ToolCallStatus};
pub use verdict::{Outcome, Verdict};
