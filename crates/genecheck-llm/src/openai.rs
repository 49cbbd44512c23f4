//! OpenAI-compatible chat-completions provider
//!
//! Speaks the chat-completions wire format with function calling, which the
//! fact-checking loop uses to let the model request knowledge-source tools.
//!
//! # Features
//!
//! - Async HTTP communication via `reqwest`
//! - Configurable endpoint, model, and API key
//! - Retry logic with exponential backoff
//! - Timeout handling

use genecheck_domain::traits::{ModelError, ReasoningModel};
use genecheck_domain::{AssistantTurn, Message, Role, ToolCallRequest, ToolSpec};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Default request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// OpenAI-compatible API provider
///
/// Works against any endpoint implementing the `/chat/completions` contract
/// with function calling.
pub struct OpenAiCompatModel {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    functions: Option<Vec<WireFunction>>,
    temperature: f32,
}

#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Serialize)]
struct WireFunction {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: WireAssistant,
}

#[derive(Deserialize)]
struct WireAssistant {
    content: Option<String>,
    function_call: Option<WireFunctionCall>,
}

#[derive(Deserialize)]
struct WireFunctionCall {
    name: String,
    arguments: String,
}

impl OpenAiCompatModel {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (e.g. `https://api.openai.com/v1`)
    /// - `model`: Model to use (e.g. `gpt-4o-mini`)
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ModelError::Unavailable(format!("failed to build client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: None,
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Set the bearer API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn wire_messages(messages: &[Message]) -> Vec<WireMessage> {
        messages
            .iter()
            .map(|m| {
                // Chat-completions models expect tool output under the
                // "function" role with the tool name attached.
                let role = match m.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                    Role::Tool => "function",
                };
                WireMessage {
                    role,
                    content: m.content.clone(),
                    name: m.tool_name.clone(),
                }
            })
            .collect()
    }

    fn wire_functions(tools: &[ToolSpec]) -> Option<Vec<WireFunction>> {
        if tools.is_empty() {
            return None;
        }
        Some(
            tools
                .iter()
                .map(|t| WireFunction {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.to_json(),
                })
                .collect(),
        )
    }

    fn parse_turn(response: ChatResponse) -> Result<AssistantTurn, ModelError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::InvalidResponse("empty choices".to_string()))?;

        if let Some(call) = choice.message.function_call {
            let arguments: Map<String, Value> = serde_json::from_str(&call.arguments)
                .map_err(|e| {
                    ModelError::InvalidResponse(format!(
                        "unparseable function arguments for '{}': {}",
                        call.name, e
                    ))
                })?;
            return Ok(AssistantTurn::ToolCall(ToolCallRequest::new(
                call.name, arguments,
            )));
        }

        match choice.message.content {
            Some(content) => Ok(AssistantTurn::Content(content)),
            None => Err(ModelError::InvalidResponse(
                "message carried neither content nor function_call".to_string(),
            )),
        }
    }

    async fn send_once(&self, request: &ChatRequest) -> Result<AssistantTurn, ModelError> {
        let url = format!("{}/chat/completions", self.endpoint);

        let mut builder = self.client.post(&url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ModelError::Timeout
            } else {
                ModelError::Unavailable(format!("request failed: {}", e))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ModelError::Unavailable(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(format!("failed to parse response: {}", e)))?;

        Self::parse_turn(parsed)
    }
}

#[async_trait::async_trait]
impl ReasoningModel for OpenAiCompatModel {
    async fn converse(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<AssistantTurn, ModelError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: Self::wire_messages(messages),
            functions: Self::wire_functions(tools),
            temperature: 0.0,
        };

        debug!(
            "chat request: {} messages, {} tools",
            messages.len(),
            tools.len()
        );

        // Retry loop with exponential backoff. Invalid responses are not
        // retried: the endpoint answered, it just answered garbage.
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.send_once(&request).await {
                Ok(turn) => return Ok(turn),
                Err(e @ ModelError::InvalidResponse(_)) => return Err(e),
                Err(e) => {
                    warn!("model call failed (attempt {}): {}", attempts + 1, e);
                    last_error = Some(e);
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| ModelError::Unavailable("max retries exceeded".to_string())))
    }
}
