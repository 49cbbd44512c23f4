//! Conversation types exchanged with the reasoning model
//!
//! The orchestrator accumulates an ordered message list per claim and sends
//! it, along with the advertised tool descriptors, to the reasoning model on
//! every round. These types are provider-agnostic; wire formats live in the
//! provider crates.

use crate::evidence::ToolCallRequest;
use serde_json::Value;
use std::collections::BTreeMap;

/// Role of a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// System instruction, first message of every conversation
    System,
    /// Caller-supplied content (the claim, reminders)
    User,
    /// Reasoning-model output fed back into the conversation
    Assistant,
    /// Tool-call result fed back as evidence
    Tool,
}

impl Role {
    /// Wire-level role name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// One message in an accumulating conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Who produced the message
    pub role: Role,
    /// Message text; for tool messages, the rendered tool result
    pub content: String,
    /// For tool messages, the name of the tool that produced the content
    pub tool_name: Option<String>,
}

impl Message {
    /// A system-instruction message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            tool_name: None,
        }
    }

    /// A user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tool_name: None,
        }
    }

    /// An assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_name: None,
        }
    }

    /// A tool-result message attributed to the named tool
    pub fn tool(tool_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_name: Some(tool_name.into()),
        }
    }
}

/// One turn produced by the reasoning model
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantTurn {
    /// The model requests a tool invocation
    ToolCall(ToolCallRequest),
    /// The model produced plain content
    Content(String),
}

/// Primitive parameter types accepted in tool argument schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// JSON string
    String,
    /// JSON number (floating point)
    Number,
    /// JSON integer
    Integer,
    /// JSON boolean
    Boolean,
    /// JSON array (of strings, e.g. a gene list)
    Array,
}

impl ParamType {
    /// JSON-schema type name
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
        }
    }

    /// Whether a JSON value conforms to this primitive type
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Number => value.is_number(),
            ParamType::Integer => value.is_i64() || value.is_u64(),
            ParamType::Boolean => value.is_boolean(),
            ParamType::Array => value.is_array(),
        }
    }
}

/// Argument schema for a tool: required field names plus per-field types
///
/// `BTreeMap` keeps property order deterministic so the advertised schema is
/// stable across rounds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterSchema {
    /// Names of required fields; must be a subset of `properties`
    pub required: Vec<String>,
    /// Field name to primitive type
    pub properties: BTreeMap<String, ParamType>,
}

impl ParameterSchema {
    /// Create an empty schema (no arguments)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property with the given type
    pub fn property(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.properties.insert(name.into(), ty);
        self
    }

    /// Mark a property as required
    pub fn require(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    /// Render as a JSON-schema object for advertisement to the model
    pub fn to_json(&self) -> Value {
        let mut properties = serde_json::Map::new();
        for (name, ty) in &self.properties {
            properties.insert(
                name.clone(),
                serde_json::json!({ "type": ty.as_str() }),
            );
        }
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": self.required,
        })
    }
}

/// Descriptor for one tool, advertised verbatim to the reasoning model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    /// Tool name, e.g. `get_pathway_for_gene_set`
    pub name: String,
    /// Human-readable description shown to the model
    pub description: String,
    /// Argument schema
    pub parameters: ParameterSchema,
}

impl ToolSpec {
    /// Create a tool descriptor
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ParameterSchema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_constructors() {
        let msg = Message::system("You are a fact-checker.");
        assert_eq!(msg.role, Role::System);
        assert!(msg.tool_name.is_none());

        let msg = Message::tool("get_pathway_for_gene_set", "KEGG: MAPK signaling");
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_name.as_deref(), Some("get_pathway_for_gene_set"));
    }

    #[test]
    fn test_param_type_matches() {
        assert!(ParamType::String.matches(&json!("ERBB2")));
        assert!(!ParamType::String.matches(&json!(42)));
        assert!(ParamType::Integer.matches(&json!(42)));
        assert!(!ParamType::Integer.matches(&json!(4.2)));
        assert!(ParamType::Number.matches(&json!(4.2)));
        assert!(ParamType::Boolean.matches(&json!(true)));
        assert!(ParamType::Array.matches(&json!(["ERBB2", "EGFR"])));
        assert!(!ParamType::Array.matches(&json!("ERBB2,EGFR")));
    }

    #[test]
    fn test_schema_to_json() {
        let schema = ParameterSchema::new()
            .property("genes", ParamType::String)
            .property("limit", ParamType::Integer)
            .require("genes");

        let json = schema.to_json();
        assert_eq!(json["type"], "object");
        assert_eq!(json["properties"]["genes"]["type"], "string");
        assert_eq!(json["properties"]["limit"]["type"], "integer");
        assert_eq!(json["required"][0], "genes");
    }

    #[test]
    fn test_role_as_str() {
        assert_eq!(Role::System.as_str(), "system");
        assert_eq!(Role::Tool.as_str(), "tool");
    }
}
