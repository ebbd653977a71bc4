//! Tool definition value object.

use super::ToolRegistryDomainError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Description used when a descriptor does not provide one.
pub const DEFAULT_TOOL_DESCRIPTION: &str = "No description available";

/// Canonical metadata for a tool exposed by a tool server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireTool")]
pub struct McpTool {
    name: String,
    description: String,
    enabled: bool,
    parameters: Value,
}

#[derive(Deserialize)]
struct WireTool {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
    #[serde(default)]
    parameters: Option<Value>,
}

const fn enabled_by_default() -> bool {
    true
}

impl TryFrom<WireTool> for McpTool {
    type Error = ToolRegistryDomainError;

    fn try_from(wire: WireTool) -> Result<Self, Self::Error> {
        let tool = Self::new(
            wire.name,
            wire.description
                .unwrap_or_else(|| DEFAULT_TOOL_DESCRIPTION.to_owned()),
            wire.parameters.unwrap_or_else(empty_parameters),
        )?;
        Ok(tool.with_enabled(wire.enabled))
    }
}

/// Returns the `{}` parameters schema used when none is declared.
#[must_use]
pub fn empty_parameters() -> Value {
    Value::Object(Map::new())
}

impl McpTool {
    /// Creates an enabled tool definition.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError::EmptyToolName`] when the trimmed
    /// name is empty.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Result<Self, ToolRegistryDomainError> {
        let normalized_name = name.into().trim().to_owned();
        if normalized_name.is_empty() {
            return Err(ToolRegistryDomainError::EmptyToolName);
        }

        Ok(Self {
            name: normalized_name,
            description: description.into(),
            enabled: true,
            parameters,
        })
    }

    /// Sets whether the tool is exposed to the agent.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns whether the tool is enabled.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the JSON-schema-shaped parameter object.
    #[must_use]
    pub const fn parameters(&self) -> &Value {
        &self.parameters
    }
}
