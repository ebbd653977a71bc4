//! Integration tests for the `reqwest` backend and probe adapters.
//!
//! Most tests run against a local `wiremock` server standing in for either
//! the application backend or a third-party tool server. Connection-level
//! failures use a bare socket instead.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use mcp_registry::tool_registry::{
    adapters::http::{HttpRegistryBackend, ReqwestProbeTransport},
    adapters::memory::StaticRemovalConfirmer,
    domain::{
        ConnectionTestResult, DEFAULT_TOOL_DESCRIPTION, McpAuthentication, McpServerName,
        ProbeFailure, ProbeTarget, ToolServerDraft, UNREACHABLE_HINT,
    },
    ports::{McpRegistryBackend, McpRegistryBackendError},
    services::{McpRegistryService, McpRegistryServiceError, ToolServerProbeService},
};
use mockable::DefaultClock;
use reqwest::{Client, Url};
use rstest::rstest;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn local_client() -> Client {
    Client::builder()
        .no_proxy()
        .build()
        .expect("failed to create HTTP client")
}

fn backend_for(server: &MockServer) -> HttpRegistryBackend {
    let base = Url::parse(&format!("{}/api/", server.uri())).expect("valid mock URL");
    HttpRegistryBackend::with_client(local_client(), base, Some("session-1".to_owned()))
        .expect("backend builds")
}

fn probe_service() -> ToolServerProbeService<ReqwestProbeTransport, DefaultClock> {
    ToolServerProbeService::new(
        Arc::new(ReqwestProbeTransport::with_client(local_client())),
        Arc::new(DefaultClock),
    )
}

fn server_name(value: &str) -> McpServerName {
    McpServerName::new(value).expect("valid server name")
}

fn registry_body() -> serde_json::Value {
    json!({
        "enabled": true,
        "servers": [
            {"name": "weather", "url": "http://weather.local"},
            {"name": "search", "url": "http://search.local", "enabled": false}
        ]
    })
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fetch_registry_sends_session_token_and_applies_defaults() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/mcp-tools"))
        .and(header("authorization", "Bearer session-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(registry_body()))
        .expect(1)
        .mount(&mock)
        .await;

    let registry = backend_for(&mock)
        .fetch_registry()
        .await
        .expect("registry should load");

    assert!(registry.enabled());
    assert_eq!(registry.servers().len(), 2);
    let weather = registry
        .find(&server_name("weather"))
        .expect("weather should exist");
    assert!(weather.enabled());
    assert_eq!(weather.timeout_ms().get(), 30_000);
    assert_eq!(weather.retry_attempts(), 3);
    assert!(
        !registry
            .find(&server_name("search"))
            .expect("search should exist")
            .enabled()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upsert_posts_full_camel_case_record() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/mcp-tools/servers"))
        .and(body_partial_json(json!({
            "name": "weather",
            "url": "http://weather.local",
            "connectionType": "http",
            "timeoutMs": 5000,
            "retryAttempts": 3,
            "enabled": true,
            "authentication": {"type": "bearer", "bearerToken": "tool-token"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock)
        .await;

    let server = ToolServerDraft::new("weather", "http://weather.local")
        .with_authentication(McpAuthentication::bearer("tool-token"))
        .with_timeout_ms(5000)
        .validate()
        .expect("valid server");

    backend_for(&mock)
        .upsert_server(&server)
        .await
        .expect("upsert should succeed");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_percent_encodes_server_name() {
    let mock = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/mcp-tools/servers/team%20tools"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock)
        .await;

    backend_for(&mock)
        .delete_server(&server_name("team tools"))
        .await
        .expect("delete should succeed");
}

#[rstest]
#[case(ResponseTemplate::new(409).set_body_json(json!({"error": "server in use"})), 409, "server in use")]
#[case(ResponseTemplate::new(403).set_body_json(json!({"message": "forbidden"})), 403, "forbidden")]
#[case(ResponseTemplate::new(500).set_body_string("database offline"), 500, "database offline")]
#[tokio::test(flavor = "multi_thread")]
async fn rejections_carry_status_and_backend_message(
    #[case] response: ResponseTemplate,
    #[case] expected_status: u16,
    #[case] expected_message: &str,
) {
    let mock = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(response)
        .mount(&mock)
        .await;

    let err = backend_for(&mock)
        .delete_server(&server_name("weather"))
        .await
        .expect_err("delete should be rejected");

    match err {
        McpRegistryBackendError::Rejected { status, message } => {
            assert_eq!(status, expected_status);
            assert_eq!(message, expected_message);
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn undecodable_registry_is_an_invalid_response() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/mcp-tools"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&mock)
        .await;

    let err = backend_for(&mock)
        .fetch_registry()
        .await
        .expect_err("HTML should not decode");

    assert!(matches!(err, McpRegistryBackendError::InvalidResponse(_)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn connection_test_and_available_tools_decode_backend_payloads() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/mcp-tools/servers/weather/test"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "message": "HTTP 401 from server"})),
        )
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/mcp-tools/available"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "get_weather", "serverName": "weather"}
        ])))
        .mount(&mock)
        .await;
    let backend = backend_for(&mock);

    let result = backend
        .test_connection(&server_name("weather"))
        .await
        .expect("test should complete");
    let tools = backend
        .available_tools()
        .await
        .expect("tool listing should succeed");

    assert_eq!(result, ConnectionTestResult::failed("HTTP 401 from server"));
    let tool = tools.first().expect("one tool should be listed");
    assert_eq!(tool.name, "get_weather");
    assert_eq!(tool.description, DEFAULT_TOOL_DESCRIPTION);
    assert_eq!(tool.parameters, json!({}));
    assert_eq!(tool.server.as_deref(), Some("weather"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_delete_over_http_leaves_list_identical() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/mcp-tools"))
        .respond_with(ResponseTemplate::new(200).set_body_json(registry_body()))
        .mount(&mock)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "locked"})))
        .expect(1)
        .mount(&mock)
        .await;
    let service = McpRegistryService::new(
        Arc::new(backend_for(&mock)),
        Arc::new(StaticRemovalConfirmer::approving()),
    );
    let before = service.list().await.expect("list should succeed");

    let result = service.remove(&server_name("weather")).await;

    assert!(matches!(
        result,
        Err(McpRegistryServiceError::Persistence(
            McpRegistryBackendError::Rejected { status: 500, .. }
        ))
    ));
    assert_eq!(service.snapshot().expect("snapshot"), before);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn discovery_sends_bearer_token_and_normalizes_function_calls() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mcp/tools"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tools": [{
                "type": "function",
                "function": {
                    "name": "get_weather",
                    "description": "Weather",
                    "parameters": {"type": "object", "properties": {"city": {"type": "string"}}}
                }
            }]
        })))
        .expect(1)
        .mount(&mock)
        .await;
    let target = ProbeTarget::new(
        format!("{}/mcp/", mock.uri()),
        McpAuthentication::bearer("abc"),
        Duration::from_secs(5),
    );

    let outcome = probe_service().discover_tools(&target).await;

    let tools = outcome.tools();
    assert_eq!(tools.len(), 1, "unexpected outcome: {outcome:?}");
    let tool = tools.first().expect("tool should exist");
    assert_eq!(tool.name(), "get_weather");
    assert_eq!(tool.description(), "Weather");
    assert!(tool.enabled());
    assert_eq!(
        tool.parameters(),
        &json!({"type": "object", "properties": {"city": {"type": "string"}}})
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn health_check_sends_api_key_header() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .and(header("x-api-key", "key-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&mock)
        .await;
    let target = ProbeTarget::new(
        mock.uri(),
        McpAuthentication::api_key("key-1"),
        Duration::from_secs(5),
    );

    let report = probe_service().check_health(&target).await;

    assert!(report.success(), "unexpected report: {report:?}");
    assert_eq!(report.message(), "Connection successful (HTTP 200)");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn health_check_reports_error_status() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock)
        .await;
    let target = ProbeTarget::new(mock.uri(), McpAuthentication::None, Duration::from_secs(5));

    let report = probe_service().check_health(&target).await;

    assert_eq!(
        report.outcome().failure(),
        Some(&ProbeFailure::HttpStatus { status: 503 })
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn slow_server_times_out_within_bound() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .mount(&mock)
        .await;
    let bound = Duration::from_millis(200);
    let target = ProbeTarget::new(mock.uri(), McpAuthentication::None, bound);
    let started = Instant::now();

    let report = probe_service().check_health(&target).await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(report.outcome().failure(), Some(&ProbeFailure::timed_out(bound)));
    assert!(report.message().contains("timed out"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refused_connection_is_a_transport_failure_with_hint() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let address = listener.local_addr().expect("local address");
    drop(listener);
    let target = ProbeTarget::new(
        format!("http://{address}"),
        McpAuthentication::None,
        Duration::from_secs(5),
    );

    let report = probe_service().check_health(&target).await;

    assert!(matches!(
        report.outcome().failure(),
        Some(ProbeFailure::Transport { likely_cors: true, .. })
    ));
    assert!(report.message().contains(UNREACHABLE_HINT));
}

/// Serves one response whose body stops short of its declared length.
fn serve_truncated_response(listener: TcpListener) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept connection");
        let mut request: Vec<u8> = Vec::new();
        let mut chunk = [0_u8; 512];
        while !request.windows(4).any(|window| window == b"\r\n\r\n") {
            let read = stream.read(&mut chunk).expect("read request");
            if read == 0 {
                break;
            }
            request.extend(chunk.iter().take(read));
        }
        stream
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 128\r\n\r\n{\"tools\": [",
            )
            .expect("write partial response");
    })
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn truncated_tools_body_is_a_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let address = listener.local_addr().expect("local address");
    let server = serve_truncated_response(listener);
    let target = ProbeTarget::new(
        format!("http://{address}"),
        McpAuthentication::None,
        Duration::from_secs(5),
    );

    let outcome = probe_service().discover_tools(&target).await;
    server.join().expect("server thread finishes");

    assert!(matches!(
        outcome.failure(),
        Some(ProbeFailure::Transport { likely_cors: false, .. })
    ));
    assert!(!outcome.message().contains("no tools found"));
}
