//! Tool registry mapping tool names to adapter capabilities and schemas

use crate::error::GatewayError;
use genecheck_domain::traits::KnowledgeAdapter;
use genecheck_domain::ToolSpec;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Registration-time errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A tool with this name is already registered
    #[error("duplicate tool: {0}")]
    DuplicateTool(String),

    /// The tool descriptor is malformed
    #[error("invalid tool spec for '{0}': {1}")]
    InvalidSpec(String, String),
}

struct RegisteredTool {
    upstream: String,
    adapter: Arc<dyn KnowledgeAdapter>,
    spec: ToolSpec,
}

/// Explicit registry mapping tool identifiers to capability implementations
///
/// Built once at startup and validated at registration time; lookups are by
/// key with no reflection or string-based dispatch beyond the map itself.
/// Multiple tools may share one upstream (and thus one rate limit and one
/// circuit).
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool bound to the named upstream
    ///
    /// Validates the descriptor: non-empty name, and every required field
    /// declared in properties.
    pub fn register(
        &mut self,
        spec: ToolSpec,
        upstream: impl Into<String>,
        adapter: Arc<dyn KnowledgeAdapter>,
    ) -> Result<(), RegistryError> {
        if spec.name.is_empty() {
            return Err(RegistryError::InvalidSpec(
                spec.name.clone(),
                "tool name must not be empty".to_string(),
            ));
        }
        for required in &spec.parameters.required {
            if !spec.parameters.properties.contains_key(required) {
                return Err(RegistryError::InvalidSpec(
                    spec.name.clone(),
                    format!("required field '{}' is not declared", required),
                ));
            }
        }
        if self.tools.contains_key(&spec.name) {
            return Err(RegistryError::DuplicateTool(spec.name.clone()));
        }

        self.tools.insert(
            spec.name.clone(),
            RegisteredTool {
                upstream: upstream.into(),
                adapter,
                spec,
            },
        );
        Ok(())
    }

    /// Resolve a tool name to its upstream, adapter, and descriptor
    pub fn resolve(
        &self,
        tool_name: &str,
    ) -> Result<(&str, Arc<dyn KnowledgeAdapter>, &ToolSpec), GatewayError> {
        let tool = self
            .tools
            .get(tool_name)
            .ok_or_else(|| GatewayError::UnknownTool(tool_name.to_string()))?;
        Ok((&tool.upstream, Arc::clone(&tool.adapter), &tool.spec))
    }

    /// Tool descriptors for advertisement to the reasoning model
    ///
    /// Sorted by name so the advertised list is stable across rounds.
    pub fn specs(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self.tools.values().map(|t| t.spec.clone()).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    /// Validate arguments against the tool's declared schema
    ///
    /// Checks that every required field is present, every provided field is
    /// declared, and every provided value matches its declared primitive
    /// type.
    pub fn validate_args(
        &self,
        tool_name: &str,
        args: &Map<String, Value>,
    ) -> Result<(), GatewayError> {
        let (_, _, spec) = self.resolve(tool_name)?;

        for required in &spec.parameters.required {
            if !args.contains_key(required) {
                return Err(GatewayError::InvalidArguments(format!(
                    "missing required field '{}' for tool '{}'",
                    required, tool_name
                )));
            }
        }

        for (name, value) in args {
            match spec.parameters.properties.get(name) {
                None => {
                    return Err(GatewayError::InvalidArguments(format!(
                        "unexpected field '{}' for tool '{}'",
                        name, tool_name
                    )));
                }
                Some(ty) if !ty.matches(value) => {
                    return Err(GatewayError::InvalidArguments(format!(
                        "field '{}' for tool '{}' must be of type {}",
                        name,
                        tool_name,
                        ty.as_str()
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
