//! Scripted probe transport for deterministic probe and discovery tests.

use crate::tool_registry::{
    domain::AuthHeaders,
    ports::{ProbeResponse, ProbeTransport, ProbeTransportError, ProbeTransportErrorKind},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio_util::sync::CancellationToken;

/// Scripted behaviour for one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedProbe {
    /// Answer with the given response.
    Respond(ProbeResponse),
    /// Fail with the given transport error.
    Fail(ProbeTransportError),
    /// Never answer; resolves only once the request is cancelled.
    Hang,
}

/// A request observed by [`ScriptedProbeTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedProbe {
    /// Requested URL.
    pub url: String,
    /// Headers sent with the request.
    pub headers: AuthHeaders,
}

/// In-memory [`ProbeTransport`] answering from a per-URL script.
///
/// URLs without a script fail as unreachable.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProbeTransport {
    state: Arc<RwLock<ScriptState>>,
}

#[derive(Debug, Default)]
struct ScriptState {
    scripts: HashMap<String, ScriptedProbe>,
    requests: Vec<RecordedProbe>,
}

impl ScriptedProbeTransport {
    /// Creates a transport with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the behaviour for `url`, replacing any previous entry.
    pub fn script(&self, url: impl Into<String>, behaviour: ScriptedProbe) {
        if let Ok(mut state) = self.state.write() {
            state.scripts.insert(url.into(), behaviour);
        }
    }

    /// Scripts a JSON response for `url`.
    pub fn respond_json(&self, url: impl Into<String>, status: u16, body: &serde_json::Value) {
        self.script(
            url,
            ScriptedProbe::Respond(ProbeResponse::new(status, body.to_string())),
        );
    }

    /// Returns the requests observed so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedProbe> {
        self.state
            .read()
            .map(|state| state.requests.clone())
            .unwrap_or_default()
    }

    fn record(&self, url: &str, headers: &AuthHeaders) -> Option<ScriptedProbe> {
        let mut state = self.state.write().ok()?;
        state.requests.push(RecordedProbe {
            url: url.to_owned(),
            headers: headers.clone(),
        });
        state.scripts.get(url).cloned()
    }
}

#[async_trait]
impl ProbeTransport for ScriptedProbeTransport {
    async fn get(
        &self,
        url: &str,
        headers: &AuthHeaders,
        cancellation: CancellationToken,
    ) -> Result<ProbeResponse, ProbeTransportError> {
        match self.record(url, headers) {
            Some(ScriptedProbe::Respond(response)) => Ok(response),
            Some(ScriptedProbe::Fail(error)) => Err(error),
            Some(ScriptedProbe::Hang) => {
                cancellation.cancelled().await;
                Err(ProbeTransportError::new(
                    ProbeTransportErrorKind::Cancelled,
                    "request cancelled",
                ))
            }
            None => Err(ProbeTransportError::new(
                ProbeTransportErrorKind::Connect,
                format!("no route to {url}"),
            )),
        }
    }
}
