//! Backend-reported connection test results and agent-visible tools.

use super::{DEFAULT_TOOL_DESCRIPTION, empty_parameters};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of a backend-mediated connection test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionTestResult {
    /// Whether the backend reached the server with full authentication.
    pub success: bool,
    /// Backend-provided explanation.
    #[serde(default)]
    pub message: String,
}

impl ConnectionTestResult {
    /// Creates a successful result.
    #[must_use]
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Creates a failed result.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

fn default_description() -> String {
    DEFAULT_TOOL_DESCRIPTION.to_owned()
}

/// A tool currently exposed to the agent, as reported by the backend after
/// merging all enabled servers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableTool {
    /// Tool name.
    pub name: String,
    /// Tool description.
    #[serde(default = "default_description")]
    pub description: String,
    /// JSON-schema-shaped parameter object.
    #[serde(default = "empty_parameters")]
    pub parameters: Value,
    /// Name of the providing server, when the backend reports it.
    #[serde(default, alias = "serverName", skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn connection_result_message_defaults_to_empty() {
        let result: ConnectionTestResult =
            serde_json::from_value(json!({"success": true})).expect("valid payload");
        assert_eq!(result, ConnectionTestResult::succeeded(""));
    }

    #[test]
    fn available_tool_accepts_server_name_alias() {
        let tool: AvailableTool = serde_json::from_value(json!({
            "name": "get_weather",
            "serverName": "weather"
        }))
        .expect("valid payload");

        assert_eq!(tool.server.as_deref(), Some("weather"));
        assert_eq!(tool.description, DEFAULT_TOOL_DESCRIPTION);
        assert_eq!(tool.parameters, json!({}));
    }
}
