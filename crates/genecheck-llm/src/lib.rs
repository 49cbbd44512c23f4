//! GeneCheck Reasoning-Model Provider Layer
//!
//! Pluggable implementations of the [`ReasoningModel`] trait from
//! `genecheck-domain`.
//!
//! # Providers
//!
//! - `MockModel`: Deterministic scripted mock for testing
//! - `OpenAiCompatModel`: OpenAI-compatible chat-completions API with
//!   function calling
//!
//! # Examples
//!
//! ```
//! use genecheck_llm::MockModel;
//! use genecheck_domain::traits::ReasoningModel;
//! use genecheck_domain::{AssistantTurn, Message};
//!
//! # tokio_test::block_on(async {
//! let model = MockModel::new("Report: no evidence either way.");
//! let turn = model
//!     .converse(&[Message::user("verify this")], &[])
//!     .await
//!     .unwrap();
//! assert_eq!(turn, AssistantTurn::Content("Report: no evidence either way.".to_string()));
//! # });
//! ```

#![warn(missing_docs)]

pub mod openai;

use genecheck_domain::traits::{ModelError, ReasoningModel};
use genecheck_domain::{AssistantTurn, Message, ToolCallRequest, ToolSpec};
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub use openai::OpenAiCompatModel;

/// Deterministic scripted reasoning model for testing
///
/// Turns are returned in the order they were pushed; once the script is
/// exhausted the model falls back to a fixed content turn. No network calls
/// are made.
///
/// # Examples
///
/// ```
/// use genecheck_llm::MockModel;
/// use genecheck_domain::traits::ReasoningModel;
/// use genecheck_domain::{AssistantTurn, Message};
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let model = MockModel::new("Report: done.");
/// model.push_tool_call("get_pathway_for_gene_set", json!({"genes": "ERBB2"}));
/// model.push_content("Report: the pathway data supports the claim.");
///
/// let first = model.converse(&[Message::user("claim")], &[]).await.unwrap();
/// assert!(matches!(first, AssistantTurn::ToolCall(_)));
///
/// let second = model.converse(&[Message::user("claim")], &[]).await.unwrap();
/// assert!(matches!(second, AssistantTurn::Content(_)));
/// assert_eq!(model.call_count(), 2);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockModel {
    fallback: String,
    script: Arc<Mutex<VecDeque<Result<AssistantTurn, ModelError>>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockModel {
    /// Create a new MockModel with a fixed fallback content turn
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Queue a scripted turn
    pub fn push_turn(&self, turn: AssistantTurn) {
        self.script.lock().unwrap().push_back(Ok(turn));
    }

    /// Queue a scripted content turn
    pub fn push_content(&self, content: impl Into<String>) {
        self.push_turn(AssistantTurn::Content(content.into()));
    }

    /// Queue a scripted tool call
    ///
    /// `arguments` must be a JSON object; anything else is queued as an
    /// empty argument map.
    pub fn push_tool_call(&self, tool_name: impl Into<String>, arguments: Value) {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.push_turn(AssistantTurn::ToolCall(ToolCallRequest::new(
            tool_name, arguments,
        )));
    }

    /// Queue a scripted error
    pub fn push_error(&self, error: ModelError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// Number of times `converse` was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }
}

impl Default for MockModel {
    fn default() -> Self {
        Self::new("Report: default mock report.")
    }
}

#[async_trait::async_trait]
impl ReasoningModel for MockModel {
    async fn converse(
        &self,
        _messages: &[Message],
        _tools: &[ToolSpec],
    ) -> Result<AssistantTurn, ModelError> {
        *self.call_count.lock().unwrap() += 1;

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(result) => result,
            None => Ok(AssistantTurn::Content(self.fallback.clone())),
        }
    }
}
