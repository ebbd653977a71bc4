//! `reqwest` implementation of the registry backend port.

use crate::config::{ConfigError, RegistryClientConfig};
use crate::tool_registry::{
    domain::{AvailableTool, ConnectionTestResult, McpServerName, RegistrySnapshot, ToolServer},
    ports::{McpRegistryBackend, McpRegistryBackendError, McpRegistryBackendResult},
};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::debug;

const REGISTRY_SEGMENT: &str = "mcp-tools";
const SERVERS_SEGMENT: &str = "servers";

/// Registry backend reached over HTTP and authenticated with the
/// application session token.
#[derive(Clone)]
pub struct HttpRegistryBackend {
    client: Client,
    base_url: Url,
    session_token: Option<String>,
}

impl fmt::Debug for HttpRegistryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRegistryBackend")
            .field("base_url", &self.base_url.as_str())
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .finish_non_exhaustive()
    }
}

impl HttpRegistryBackend {
    /// Creates a backend client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBackendUrl`] when the URL cannot carry
    /// a path, or [`ConfigError::HttpClient`] when the client cannot be
    /// built.
    pub fn new(
        base_url: Url,
        session_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ConfigError::http_client)?;
        Self::with_client(client, base_url, session_token)
    }

    /// Creates a backend client around an existing `reqwest` client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBackendUrl`] when the URL cannot carry
    /// a path.
    pub fn with_client(
        client: Client,
        base_url: Url,
        session_token: Option<String>,
    ) -> Result<Self, ConfigError> {
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBackendUrl {
                url: base_url.to_string(),
                reason: "URL cannot be used as a base".to_owned(),
            });
        }
        Ok(Self {
            client,
            base_url,
            session_token,
        })
    }

    /// Creates a backend client from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration is invalid or the
    /// client cannot be built.
    pub fn from_config(config: &RegistryClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::new(
            config.backend_base_url()?,
            config.session_token.clone(),
            config.request_timeout(),
        )
    }

    /// Builds `{base}/mcp-tools/{segments..}`, percent-encoding each
    /// segment individually.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .push(REGISTRY_SEGMENT)
                .extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, url = %url, "sending registry backend request");
        let mut builder = self.client.request(method, url);
        if let Some(token) = &self.session_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send(builder: RequestBuilder) -> McpRegistryBackendResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(McpRegistryBackendError::transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(McpRegistryBackendError::rejected(
            status.as_u16(),
            rejection_message(status, &body),
        ))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> McpRegistryBackendResult<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(McpRegistryBackendError::transport)?;
        serde_json::from_slice(&bytes).map_err(McpRegistryBackendError::invalid_response)
    }
}

/// Extracts a human-readable reason from an error response body.
fn rejection_message(status: reqwest::StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["error", "message"].iter().find_map(|field| {
                value
                    .get(field)
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_owned)
            })
        });
    if let Some(message) = from_json {
        return message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_owned)
    } else {
        trimmed.to_owned()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AvailableToolsPayload {
    List(Vec<AvailableTool>),
    Wrapped { tools: Vec<AvailableTool> },
}

impl From<AvailableToolsPayload> for Vec<AvailableTool> {
    fn from(payload: AvailableToolsPayload) -> Self {
        match payload {
            AvailableToolsPayload::List(tools) | AvailableToolsPayload::Wrapped { tools } => tools,
        }
    }
}

#[async_trait]
impl McpRegistryBackend for HttpRegistryBackend {
    async fn fetch_registry(&self) -> McpRegistryBackendResult<RegistrySnapshot> {
        let builder = self.request(Method::GET, self.endpoint(&[]));
        Self::decode(Self::send(builder).await?).await
    }

    async fn save_registry(&self, registry: &RegistrySnapshot) -> McpRegistryBackendResult<()> {
        let builder = self.request(Method::PUT, self.endpoint(&[])).json(registry);
        Self::send(builder).await.map(|_| ())
    }

    async fn upsert_server(&self, server: &ToolServer) -> McpRegistryBackendResult<()> {
        let builder = self
            .request(Method::POST, self.endpoint(&[SERVERS_SEGMENT]))
            .json(server);
        Self::send(builder).await.map(|_| ())
    }

    async fn delete_server(&self, name: &McpServerName) -> McpRegistryBackendResult<()> {
        let url = self.endpoint(&[SERVERS_SEGMENT, name.as_str()]);
        Self::send(self.request(Method::DELETE, url))
            .await
            .map(|_| ())
    }

    async fn test_connection(
        &self,
        name: &McpServerName,
    ) -> McpRegistryBackendResult<ConnectionTestResult> {
        let url = self.endpoint(&[SERVERS_SEGMENT, name.as_str(), "test"]);
        Self::decode(Self::send(self.request(Method::POST, url)).await?).await
    }

    async fn available_tools(&self) -> McpRegistryBackendResult<Vec<AvailableTool>> {
        let builder = self.request(Method::GET, self.endpoint(&["available"]));
        let payload: AvailableToolsPayload = Self::decode(Self::send(builder).await?).await?;
        Ok(payload.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn backend(base: &str) -> HttpRegistryBackend {
        let url = Url::parse(base).expect("valid URL");
        HttpRegistryBackend::new(url, None, Duration::from_secs(1)).expect("client builds")
    }

    #[rstest]
    #[case("http://localhost:8080", &[], "http://localhost:8080/mcp-tools")]
    #[case("http://localhost:8080/api/", &["servers"], "http://localhost:8080/api/mcp-tools/servers")]
    #[case(
        "http://localhost/api",
        &["servers", "my tools/v2", "test"],
        "http://localhost/api/mcp-tools/servers/my%20tools%2Fv2/test"
    )]
    fn endpoints_encode_each_segment(
        #[case] base: &str,
        #[case] segments: &[&str],
        #[case] expected: &str,
    ) {
        assert_eq!(backend(base).endpoint(segments).as_str(), expected);
    }

    #[rstest]
    #[case(r#"{"error":"server is locked"}"#, "server is locked")]
    #[case(r#"{"message":"quota exceeded"}"#, "quota exceeded")]
    #[case("plain failure\n", "plain failure")]
    #[case("", "Internal Server Error")]
    fn rejection_messages_prefer_structured_fields(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(
            rejection_message(reqwest::StatusCode::INTERNAL_SERVER_ERROR, body),
            expected
        );
    }

    #[rstest]
    fn debug_output_redacts_session_token() {
        let url = Url::parse("http://localhost").expect("valid URL");
        let client = HttpRegistryBackend::new(url, Some("secret".to_owned()), Duration::from_secs(1))
            .expect("client builds");
        assert!(!format!("{client:?}").contains("secret"));
    }
}
