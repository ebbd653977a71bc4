//! Direct health and tool-discovery probes against third-party servers.

use crate::tool_registry::{
    domain::{
        DiscoveryOutcome, HealthBody, HealthCheckOutcome, HealthCheckReport, ProbeFailure,
        ProbeTarget, health_check_url, normalize_tools_response, tools_url,
    },
    ports::{ProbeResponse, ProbeTransport, ProbeTransportError, ProbeTransportErrorKind},
};
use mockable::Clock;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Issues bounded probes against tool servers.
///
/// Probes never return `Err`: every failure is classified into a
/// [`ProbeFailure`]. Each probe owns its own cancellation token and
/// resolves at its bound even when the server never answers.
#[derive(Clone)]
pub struct ToolServerProbeService<T, C>
where
    T: ProbeTransport,
    C: Clock + Send + Sync,
{
    transport: Arc<T>,
    clock: Arc<C>,
}

impl<T, C> ToolServerProbeService<T, C>
where
    T: ProbeTransport,
    C: Clock + Send + Sync,
{
    /// Creates a probe service.
    #[must_use]
    pub const fn new(transport: Arc<T>, clock: Arc<C>) -> Self {
        Self { transport, clock }
    }

    /// Probes `{url}/health` with the target's credentials.
    pub async fn check_health(&self, target: &ProbeTarget) -> HealthCheckReport {
        let url = health_check_url(target.url());
        info!(url = %url, timeout_ms = target.timeout().as_millis(), "checking tool server health");

        let outcome = match self.fetch(&url, target).await {
            Ok(response) if response.is_success() => HealthCheckOutcome::Healthy {
                status: response.status,
                body: HealthBody::from_bytes(&response.body),
            },
            Ok(response) => HealthCheckOutcome::Failed(ProbeFailure::HttpStatus {
                status: response.status,
            }),
            Err(failure) => HealthCheckOutcome::Failed(failure),
        };

        match outcome.failure() {
            Some(failure) => warn!(url = %url, %failure, "tool server health check failed"),
            None => info!(url = %url, "tool server is healthy"),
        }
        HealthCheckReport::new(url, outcome, self.clock.utc())
    }

    /// Fetches `{url}/tools` and normalizes the advertised tools.
    pub async fn discover_tools(&self, target: &ProbeTarget) -> DiscoveryOutcome {
        let url = tools_url(target.url());
        info!(url = %url, timeout_ms = target.timeout().as_millis(), "discovering tools");

        let response = match self.fetch(&url, target).await {
            Ok(response) => response,
            Err(failure) => return discovery_failed(&url, failure),
        };
        if !response.is_success() {
            return discovery_failed(
                &url,
                ProbeFailure::HttpStatus {
                    status: response.status,
                },
            );
        }

        let Ok(body) = serde_json::from_slice::<serde_json::Value>(&response.body) else {
            debug!(url = %url, "tools endpoint returned a non-JSON body");
            return discovery_failed(&url, ProbeFailure::NoToolsFound);
        };
        let normalized = normalize_tools_response(&body);
        if normalized.skipped > 0 {
            warn!(url = %url, skipped = normalized.skipped, "skipped tool descriptors without a name");
        }
        if !normalized.duplicates.is_empty() {
            warn!(
                url = %url,
                duplicates = ?normalized.duplicates,
                "dropped duplicate tool names, keeping first occurrence"
            );
        }
        if normalized.tools.is_empty() {
            return discovery_failed(&url, ProbeFailure::NoToolsFound);
        }

        info!(url = %url, envelope = ?normalized.envelope, count = normalized.tools.len(), "discovered tools");
        DiscoveryOutcome::Discovered(normalized.tools)
    }

    /// Sends one bounded `GET`.
    ///
    /// Credentials are resolved before any I/O so unsupported schemes never
    /// reach the network.
    async fn fetch(&self, url: &str, target: &ProbeTarget) -> Result<ProbeResponse, ProbeFailure> {
        let headers = target.authentication().resolve_headers()?;
        let timeout = target.timeout();
        let cancellation = CancellationToken::new();
        let request = self.transport.get(url, &headers, cancellation.child_token());

        tokio::select! {
            result = request => result.map_err(|err| classify_transport_error(err, target)),
            () = tokio::time::sleep(timeout) => {
                cancellation.cancel();
                Err(ProbeFailure::timed_out(timeout))
            }
        }
    }
}

fn classify_transport_error(err: ProbeTransportError, target: &ProbeTarget) -> ProbeFailure {
    match err.kind {
        ProbeTransportErrorKind::Cancelled => ProbeFailure::timed_out(target.timeout()),
        ProbeTransportErrorKind::Connect => ProbeFailure::Transport {
            detail: err.detail,
            likely_cors: true,
        },
        ProbeTransportErrorKind::Other => ProbeFailure::Transport {
            detail: err.detail,
            likely_cors: false,
        },
    }
}

fn discovery_failed(url: &str, failure: ProbeFailure) -> DiscoveryOutcome {
    warn!(url = %url, %failure, "tool discovery failed");
    DiscoveryOutcome::Failed(failure)
}
