//! Remote-first registry flows against the in-memory backend.

use super::helpers::{RegistryContext, context, name};
use mcp_registry::tool_registry::{
    domain::{ConnectionTestResult, McpAuthentication, ToolServerDraft},
    services::McpRegistryServiceError,
};
use rstest::rstest;

fn names(context: &RegistryContext) -> Vec<String> {
    context
        .registry
        .snapshot()
        .expect("snapshot")
        .servers()
        .iter()
        .map(|server| server.name().to_string())
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_replaces_local_snapshot(context: RegistryContext) {
    assert!(names(&context).is_empty());

    let listed = context.registry.list().await.expect("list should succeed");

    assert_eq!(listed, context.registry.snapshot().expect("snapshot"));
    assert_eq!(names(&context), ["alpha", "beta"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_mutation_is_mirrored_in_the_backend(context: RegistryContext) {
    context.registry.list().await.expect("list should succeed");

    context
        .registry
        .upsert(
            &ToolServerDraft::new("gamma", "http://gamma.local")
                .with_authentication(McpAuthentication::api_key("k")),
        )
        .await
        .expect("upsert should succeed");
    context
        .registry
        .set_server_enabled(&name("alpha"), false)
        .await
        .expect("server switch should succeed");
    context
        .registry
        .remove(&name("beta"))
        .await
        .expect("removal should succeed");
    context
        .registry
        .set_global_enabled(false)
        .await
        .expect("global switch should succeed");

    let local = context.registry.snapshot().expect("snapshot");
    assert_eq!(context.backend.stored_registry().expect("stored"), local);
    assert_eq!(names(&context), ["alpha", "gamma"]);
    assert!(!local.enabled());
    assert_eq!(context.confirmer.prompt_count(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_mutations_leave_local_state_untouched(context: RegistryContext) {
    let before = context.registry.list().await.expect("list should succeed");
    context
        .backend
        .reject_requests(503, "maintenance")
        .expect("configure rejection");

    let upsert = context
        .registry
        .upsert(&ToolServerDraft::new("gamma", "http://gamma.local"))
        .await;
    let removal = context.registry.remove(&name("alpha")).await;
    let toggle = context.registry.set_server_enabled(&name("beta"), false).await;
    let global = context.registry.set_global_enabled(false).await;

    for result in [upsert.err(), removal.err(), toggle.err(), global.err()] {
        assert!(matches!(result, Some(McpRegistryServiceError::Persistence(_))));
    }
    assert_eq!(context.registry.snapshot().expect("snapshot"), before);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn validation_failure_sends_no_request(context: RegistryContext) {
    let before = context.backend.request_count().expect("count");

    let result = context
        .registry
        .upsert(&ToolServerDraft::new("", "http://nameless.local"))
        .await;

    assert!(matches!(result, Err(McpRegistryServiceError::Validation(_))));
    assert_eq!(context.backend.request_count().expect("count"), before);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn connection_test_reports_backend_result(context: RegistryContext) {
    context.registry.list().await.expect("list should succeed");
    context
        .backend
        .set_connection_result(name("beta"), ConnectionTestResult::failed("HTTP 401"))
        .expect("configure result");

    let alpha = context
        .registry
        .test_connection(&name("alpha"))
        .await
        .expect("test should complete");
    let beta = context
        .registry
        .test_connection(&name("beta"))
        .await
        .expect("test should complete");

    assert!(alpha.success);
    assert_eq!(beta, ConnectionTestResult::failed("HTTP 401"));
}
