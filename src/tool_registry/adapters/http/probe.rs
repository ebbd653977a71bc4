//! `reqwest` implementation of the probe transport port.

use crate::config::ConfigError;
use crate::tool_registry::{
    domain::AuthHeaders,
    ports::{ProbeResponse, ProbeTransport, ProbeTransportError, ProbeTransportErrorKind},
};
use async_trait::async_trait;
use reqwest::Client;
use std::error::Error as _;
use tokio_util::sync::CancellationToken;

/// Probe transport issuing real HTTP requests.
///
/// The client carries no timeout of its own; probe bounds come from the
/// cancellation token supplied by the caller.
#[derive(Debug, Clone)]
pub struct ReqwestProbeTransport {
    client: Client,
}

impl ReqwestProbeTransport {
    /// Creates a transport with a fresh client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] when the client cannot be built.
    pub fn new() -> Result<Self, ConfigError> {
        let client = Client::builder()
            .build()
            .map_err(ConfigError::http_client)?;
        Ok(Self { client })
    }

    /// Creates a transport around an existing client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn exchange(
        &self,
        url: &str,
        headers: &AuthHeaders,
    ) -> Result<ProbeResponse, ProbeTransportError> {
        let mut request = self.client.get(url);
        for (name, value) in headers.iter() {
            request = request.header(name, value);
        }
        let response = request.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(classify)?;
        Ok(ProbeResponse::new(status, body.to_vec()))
    }
}

fn classify(err: reqwest::Error) -> ProbeTransportError {
    let kind = if err.is_connect() {
        ProbeTransportErrorKind::Connect
    } else {
        ProbeTransportErrorKind::Other
    };
    ProbeTransportError::new(kind, error_chain(&err))
}

fn error_chain(err: &reqwest::Error) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}

#[async_trait]
impl ProbeTransport for ReqwestProbeTransport {
    async fn get(
        &self,
        url: &str,
        headers: &AuthHeaders,
        cancellation: CancellationToken,
    ) -> Result<ProbeResponse, ProbeTransportError> {
        tokio::select! {
            () = cancellation.cancelled() => Err(ProbeTransportError::new(
                ProbeTransportErrorKind::Cancelled,
                "request cancelled",
            )),
            result = self.exchange(url, headers) => result,
        }
    }
}
