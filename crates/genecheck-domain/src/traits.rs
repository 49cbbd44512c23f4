//! Trait definitions for external collaborators
//!
//! These traits define the boundaries between the verification engine and
//! infrastructure. Reasoning-model providers live in `genecheck-llm`;
//! knowledge-source adapters are provided by callers per upstream database.

use crate::conversation::{AssistantTurn, Message, ToolSpec};
use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors from the reasoning-model interface
///
/// The orchestrator treats all variants as run-terminating after one retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The model endpoint could not be reached or rejected the request
    #[error("model unavailable: {0}")]
    Unavailable(String),

    /// The model call exceeded its deadline
    #[error("model timeout")]
    Timeout,

    /// The model returned something the provider could not interpret
    #[error("invalid model response: {0}")]
    InvalidResponse(String),
}

/// Error from a knowledge-source adapter
///
/// The gateway treats any adapter error uniformly regardless of the
/// upstream-specific cause, so a single opaque detail string suffices.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct AdapterError(pub String);

impl AdapterError {
    /// Create an adapter error from any displayable cause
    pub fn new(detail: impl Into<String>) -> Self {
        Self(detail.into())
    }
}

/// The reasoning-model interface (external collaborator)
///
/// One call per orchestrator round: the full conversation so far plus the
/// advertised tool descriptors, returning either a tool call or content.
#[async_trait]
pub trait ReasoningModel: Send + Sync {
    /// Exchange one turn with the model
    async fn converse(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<AssistantTurn, ModelError>;
}

/// A knowledge-source adapter capability (external collaborator, one per
/// upstream database)
///
/// Query construction and response parsing specific to an upstream live
/// behind this trait; the gateway only sees JSON in, JSON out.
#[async_trait]
pub trait KnowledgeAdapter: Send + Sync {
    /// Execute one query against the upstream
    async fn fetch(&self, query: &Map<String, Value>) -> Result<Value, AdapterError>;
}
