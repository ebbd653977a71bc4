//! Command-line client for the MCP tool server registry.
//!
//! Usage:
//!
//! ```text
//! mcp-registry [--json-logs] <command>
//! ```
//!
//! `health` and `discover` probe a tool server directly with the given
//! credentials. `list`, `available`, `test`, and `remove` talk to the
//! application backend configured through `MCP_REGISTRY_BACKEND_URL` and
//! `MCP_REGISTRY_SESSION_TOKEN`.

use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use mcp_registry::config::{ConfigError, PROBE_TIMEOUT_VAR, RegistryClientConfig};
use mcp_registry::telemetry::{LogFormat, init_tracing};
use mcp_registry::tool_registry::{
    adapters::http::{HttpRegistryBackend, ReqwestProbeTransport},
    adapters::memory::StaticRemovalConfirmer,
    domain::{
        DEFAULT_TIMEOUT_MS, McpAuthentication, McpServerName, ProbeTarget, ToolRegistryDomainError,
        ToolServer,
    },
    ports::RemovalConfirmer,
    services::{McpRegistryService, McpRegistryServiceError, ToolServerProbeService},
};
use mockable::DefaultClock;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Builder;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    InvalidName(#[from] ToolRegistryDomainError),
    #[error(transparent)]
    Registry(#[from] McpRegistryServiceError),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("{0}")]
    ProbeFailed(String),
}

#[derive(Debug, Parser)]
#[command(name = "mcp-registry", version, about = "Manage MCP tool servers")]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check a tool server's health endpoint directly.
    Health(ProbeArgs),
    /// Discover the tools a server advertises.
    Discover(ProbeArgs),
    /// List registered servers.
    List,
    /// List tools currently exposed to the agent.
    Available,
    /// Ask the backend to test a registered server.
    Test {
        /// Server name.
        name: String,
    },
    /// Remove a registered server.
    Remove {
        /// Server name.
        name: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
struct ProbeArgs {
    /// Base URL of the tool server.
    #[arg(long)]
    url: String,
    /// API key sent as `X-API-Key`.
    #[arg(long, conflicts_with = "bearer_token")]
    api_key: Option<String>,
    /// Token sent as `Authorization: Bearer`.
    #[arg(long)]
    bearer_token: Option<String>,
    /// Probe bound in milliseconds.
    #[arg(long, env = PROBE_TIMEOUT_VAR, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,
}

impl ProbeArgs {
    fn target(&self) -> ProbeTarget {
        let authentication = match (&self.api_key, &self.bearer_token) {
            (Some(key), _) => McpAuthentication::api_key(key.clone()),
            (None, Some(token)) => McpAuthentication::bearer(token.clone()),
            (None, None) => McpAuthentication::None,
        };
        ProbeTarget::new(
            self.url.clone(),
            authentication,
            Duration::from_millis(self.timeout_ms.max(1)),
        )
    }
}

/// Asks on the terminal unless consent was given up front.
#[derive(Debug, Clone)]
enum CliConfirmer {
    Preapproved(StaticRemovalConfirmer),
    Prompt,
}

#[async_trait]
impl RemovalConfirmer for CliConfirmer {
    async fn confirm_removal(&self, server: &ToolServer) -> bool {
        match self {
            Self::Preapproved(confirmer) => confirmer.confirm_removal(server).await,
            Self::Prompt => {
                let name = server.name().to_string();
                tokio::task::spawn_blocking(move || prompt_yes_no(&name))
                    .await
                    .unwrap_or(false)
            }
        }
    }
}

fn prompt_yes_no(name: &str) -> bool {
    let mut stderr = io::stderr().lock();
    if write!(stderr, "Remove tool server '{name}'? [y/N] ").is_err() || stderr.flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing(format)?;

    let runtime = Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(run(cli.command)).map_err(Into::into)
}

async fn run(command: Command) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    match command {
        Command::Health(args) => {
            let probes = probe_service()?;
            let report = probes.check_health(&args.target()).await;
            writeln!(
                stdout,
                "{} [{}]: {}",
                report.url(),
                report.status(),
                report.message()
            )?;
            if !report.success() {
                return Err(CliError::ProbeFailed(report.message()));
            }
        }
        Command::Discover(args) => {
            let probes = probe_service()?;
            let outcome = probes.discover_tools(&args.target()).await;
            if !outcome.success() {
                return Err(CliError::ProbeFailed(outcome.message()));
            }
            writeln!(stdout, "{}", serde_json::to_string_pretty(outcome.tools())?)?;
        }
        Command::List => {
            let registry = registry_service(CliConfirmer::Prompt)?;
            let snapshot = registry.list().await?;
            writeln!(stdout, "{}", serde_json::to_string_pretty(&snapshot)?)?;
        }
        Command::Available => {
            let registry = registry_service(CliConfirmer::Prompt)?;
            let tools = registry.available_tools().await?;
            writeln!(stdout, "{}", serde_json::to_string_pretty(&tools)?)?;
        }
        Command::Test { name } => {
            let registry = registry_service(CliConfirmer::Prompt)?;
            let server_name = McpServerName::new(name)?;
            registry.list().await?;
            let result = registry.test_connection(&server_name).await?;
            writeln!(stdout, "{}", result.message)?;
            if !result.success {
                return Err(CliError::ProbeFailed(result.message));
            }
        }
        Command::Remove { name, yes } => {
            let confirmer = if yes {
                CliConfirmer::Preapproved(StaticRemovalConfirmer::approving())
            } else {
                CliConfirmer::Prompt
            };
            let registry = registry_service(confirmer)?;
            let server_name = McpServerName::new(name)?;
            registry.list().await?;
            let removed = registry.remove(&server_name).await?;
            writeln!(stdout, "removed {}", removed.name())?;
        }
    }
    Ok(())
}

fn probe_service() -> Result<ToolServerProbeService<ReqwestProbeTransport, DefaultClock>, CliError> {
    Ok(ToolServerProbeService::new(
        Arc::new(ReqwestProbeTransport::new()?),
        Arc::new(DefaultClock),
    ))
}

fn registry_service(
    confirmer: CliConfirmer,
) -> Result<McpRegistryService<HttpRegistryBackend, CliConfirmer>, CliError> {
    let config = RegistryClientConfig::from_env()?;
    let backend = HttpRegistryBackend::from_config(&config)?;
    Ok(McpRegistryService::new(Arc::new(backend), Arc::new(confirmer)))
}
