//! Probe and discovery flows feeding the registry.

use super::helpers::{RegistryContext, TestProbes, context, name, probes};
use mcp_registry::tool_registry::{
    adapters::memory::ScriptedProbeTransport,
    domain::{DEFAULT_TOOL_DESCRIPTION, McpAuthentication, ProbeTarget, ToolServerDraft},
    services::{DiscardPolicy, EditSessionSlot},
};
use rstest::rstest;
use serde_json::{Value, json};

fn descriptors() -> Value {
    json!([
        {"name": "flat_tool"},
        {"type": "function", "function": {"name": "fn_tool", "description": "Nested"}},
        {"function": {"name": "partial_fn", "parameters": {"type": "object"}}}
    ])
}

#[rstest]
#[case(descriptors())]
#[case(json!({"tools": descriptors()}))]
#[case(json!({"data": descriptors()}))]
#[tokio::test(flavor = "multi_thread")]
async fn every_envelope_yields_the_same_tools(
    probes: (ScriptedProbeTransport, TestProbes),
    #[case] body: Value,
) {
    let (transport, service) = probes;
    transport.respond_json("http://tools.local/tools", 200, &body);
    let target = ProbeTarget::from_draft(&ToolServerDraft::new("tools", "http://tools.local//"));

    let outcome = service.discover_tools(&target).await;

    let summary: Vec<(&str, &str, bool)> = outcome
        .tools()
        .iter()
        .map(|tool| (tool.name(), tool.description(), tool.enabled()))
        .collect();
    assert_eq!(
        summary,
        [
            ("flat_tool", DEFAULT_TOOL_DESCRIPTION, true),
            ("fn_tool", "Nested", true),
            ("partial_fn", DEFAULT_TOOL_DESCRIPTION, true),
        ]
    );
    let last = outcome.tools().last().expect("three tools");
    assert_eq!(last.parameters(), &json!({"type": "object"}));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn discovered_tools_are_saved_through_the_edit_session(
    context: RegistryContext,
    probes: (ScriptedProbeTransport, TestProbes),
) {
    let (transport, service) = probes;
    transport.respond_json(
        "http://alpha-v2.local/tools",
        200,
        &json!([{"name": "lookup", "inputSchema": {"type": "object"}}]),
    );
    let listed = context.registry.list().await.expect("list should succeed");
    let alpha = listed.find(&name("alpha")).expect("alpha should exist");
    let mut slot = EditSessionSlot::new();
    let draft = slot
        .begin_edit(alpha, DiscardPolicy::KeepUnsaved)
        .expect("open session");
    draft.url = "http://alpha-v2.local".to_owned();
    draft.authentication = McpAuthentication::bearer("token");

    let outcome = service
        .discover_tools(&slot.probe_target().expect("target"))
        .await;
    assert!(slot.apply_discovery(&outcome).expect("session active"));
    let saved = slot.commit(&context.registry).await.expect("commit");

    assert_eq!(saved.url(), "http://alpha-v2.local");
    assert_eq!(saved.tools().len(), 1);
    let requests = transport.requests();
    let sent = requests.first().expect("discovery request");
    assert_eq!(sent.headers.get("Authorization"), Some("Bearer token"));
    assert_eq!(
        context
            .backend
            .stored_registry()
            .expect("stored")
            .find(&name("alpha")),
        Some(&saved)
    );
}
