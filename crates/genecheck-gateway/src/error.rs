//! Error types for the gateway

use thiserror::Error;

/// Errors that can occur during a gateway invocation
///
/// All variants are round-level: the orchestrator feeds them back into the
/// conversation as error tool results rather than aborting the claim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The requested tool is not registered
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The arguments do not satisfy the tool's declared schema
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The upstream's circuit is open; no network call was made
    #[error("circuit open for upstream '{0}'")]
    CircuitOpen(String),

    /// No rate-limit token became available within the wait bound
    #[error("rate limited for upstream '{0}'")]
    RateLimited(String),

    /// The adapter call exceeded its deadline
    #[error("upstream timeout for '{0}'")]
    UpstreamTimeout(String),

    /// The adapter reported a failure
    #[error("upstream error: {0}")]
    Upstream(String),
}

impl GatewayError {
    /// Stable short name of the error kind, used as a failure reason
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::UnknownTool(_) => "unknown tool",
            GatewayError::InvalidArguments(_) => "invalid arguments",
            GatewayError::CircuitOpen(_) => "circuit open",
            GatewayError::RateLimited(_) => "rate limited",
            GatewayError::UpstreamTimeout(_) => "upstream timeout",
            GatewayError::Upstream(_) => "upstream error",
        }
    }
}
