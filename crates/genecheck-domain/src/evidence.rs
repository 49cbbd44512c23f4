//! Tool-call requests, results, and the append-only evidence log

use serde_json::{Map, Value};
use std::fmt;

/// A model-issued request to invoke a named tool with JSON arguments
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRequest {
    /// Name of the tool to invoke
    pub tool_name: String,
    /// Argument object as produced by the model
    pub arguments: Map<String, Value>,
}

impl ToolCallRequest {
    /// Create a tool-call request
    pub fn new(tool_name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }
}

/// Outcome of one tool invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCallStatus {
    /// The tool returned data
    Ok,
    /// The invocation failed; see the error detail
    Error,
}

/// Result of one tool invocation, retained as evidence
///
/// Exactly one of `payload` (Ok) or `error_detail` (Error) is set.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallResult {
    /// Name of the tool that was invoked
    pub tool_name: String,
    /// Whether the invocation succeeded
    pub status: ToolCallStatus,
    /// Returned data on success
    pub payload: Option<Value>,
    /// Error detail on failure
    pub error_detail: Option<String>,
}

impl ToolCallResult {
    /// A successful result carrying the returned data
    pub fn ok(tool_name: impl Into<String>, payload: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            status: ToolCallStatus::Ok,
            payload: Some(payload),
            error_detail: None,
        }
    }

    /// A failed result carrying the error detail
    pub fn error(tool_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            status: ToolCallStatus::Error,
            payload: None,
            error_detail: Some(detail.into()),
        }
    }

    /// Whether the invocation succeeded
    pub fn is_ok(&self) -> bool {
        self.status == ToolCallStatus::Ok
    }
}

impl fmt::Display for ToolCallResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            ToolCallStatus::Ok => write!(
                f,
                "{} returned {}",
                self.tool_name,
                self.payload.as_ref().unwrap_or(&Value::Null)
            ),
            ToolCallStatus::Error => write!(
                f,
                "{} failed: {}",
                self.tool_name,
                self.error_detail.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}

/// Append-only log of tool-call results for one claim's verification run
///
/// Evidence only grows, never shrinks, within a run. The log is owned by the
/// orchestrator and handed to the verdict when the run terminates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvidenceLog {
    entries: Vec<ToolCallResult>,
}

impl EvidenceLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one result
    pub fn record(&mut self, result: ToolCallResult) {
        self.entries.push(result);
    }

    /// All entries, in invocation order
    pub fn entries(&self) -> &[ToolCallResult] {
        &self.entries
    }

    /// Number of recorded results
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no results have been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether every recorded invocation failed
    ///
    /// False for an empty log: no invocations means nothing failed.
    pub fn all_failed(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(|e| !e.is_ok())
    }

    /// Error detail of the most recent failed invocation, if any
    pub fn last_error_detail(&self) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| !e.is_ok())
            .and_then(|e| e.error_detail.as_deref())
    }
}
