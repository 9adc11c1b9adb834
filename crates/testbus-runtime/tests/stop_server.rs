use std::sync::Arc;

use serde_json::json;
use testbus_core::mock::{MockQueueEndpoint, MockServerEndpoint};
use testbus_core::{
    ActionDescriptor, Endpoint, EndpointName, EndpointRegistry, FailureKind, ServerControl,
    TestContext, TestDefinition,
};
use testbus_runtime::{builtin_registry, ActionExecutor, ExecutionOptions};

fn executor() -> ActionExecutor {
    ActionExecutor::new(Arc::new(builtin_registry()))
}

#[tokio::test]
async fn stops_single_server_by_reference() {
    let server = Arc::new(MockServerEndpoint::new(EndpointName::new("app")));
    let endpoints = EndpointRegistry::builder().bind(server.clone() as Arc<dyn Endpoint>).build();
    let mut ctx = TestContext::new("single-stop", endpoints);

    let definition = TestDefinition::new("single-stop")
        .with_action(ActionDescriptor::new("stop-server", json!({"server": "app"})));
    let report = executor().execute(&definition, &mut ctx, &ExecutionOptions::default()).await;

    assert!(report.passed());
    assert!(!server.is_running());
    assert_eq!(report.actions[0].targets.len(), 1);
    assert!(report.actions[0].targets[0].success);
}

#[tokio::test]
async fn failing_target_does_not_block_the_rest() {
    let a = Arc::new(MockServerEndpoint::new(EndpointName::new("a")));
    let b = Arc::new(MockServerEndpoint::new(EndpointName::new("b")).failing_on_stop());
    let endpoints = EndpointRegistry::builder()
        .bind(a.clone() as Arc<dyn Endpoint>)
        .bind(b.clone() as Arc<dyn Endpoint>)
        .build();
    let mut ctx = TestContext::new("best-effort", endpoints);

    // b fails first; a must still be attempted.
    let definition = TestDefinition::new("best-effort")
        .with_action(ActionDescriptor::new("stop-server", json!({"servers": ["b", "a"]})));
    let report = executor().execute(&definition, &mut ctx, &ExecutionOptions::default()).await;

    assert!(!report.passed());
    let action = &report.actions[0];
    let failure = action.failure.as_ref().expect("action must fail");
    assert_eq!(failure.kind, FailureKind::ServerStop);

    assert_eq!(action.targets.len(), 2);
    assert_eq!(action.targets[0].endpoint, EndpointName::new("b"));
    assert!(!action.targets[0].success);
    assert_eq!(action.targets[1].endpoint, EndpointName::new("a"));
    assert!(action.targets[1].success);

    assert_eq!(a.stop_calls(), 1);
    assert_eq!(b.stop_calls(), 1);
    assert!(!a.is_running());
}

#[tokio::test]
async fn unresolvable_reference_aborts_before_any_stop() {
    let a = Arc::new(MockServerEndpoint::new(EndpointName::new("a")));
    let endpoints = EndpointRegistry::builder().bind(a.clone() as Arc<dyn Endpoint>).build();
    let mut ctx = TestContext::new("unresolved", endpoints);

    let definition = TestDefinition::new("unresolved")
        .with_action(ActionDescriptor::new("stop-server", json!({"servers": ["a", "ghost"]})))
        .with_action(ActionDescriptor::new("echo", json!({"message": "never runs"})));
    let report = executor().execute(&definition, &mut ctx, &ExecutionOptions::default()).await;

    // One failed result, no further action attempted.
    assert_eq!(report.actions.len(), 1);
    let failure = report.actions[0].failure.as_ref().expect("action must fail");
    assert_eq!(failure.kind, FailureKind::ServerResolution);
    assert!(failure.message.contains("ghost"));

    // Resolution happens before any shutdown call.
    assert_eq!(a.stop_calls(), 0);
    assert!(a.is_running());
}

#[tokio::test]
async fn non_server_endpoint_is_a_resolution_failure() {
    let queue = Arc::new(MockQueueEndpoint::new(EndpointName::new("q")));
    let endpoints = EndpointRegistry::builder().bind(queue as Arc<dyn Endpoint>).build();
    let mut ctx = TestContext::new("not-a-server", endpoints);

    let definition = TestDefinition::new("not-a-server")
        .with_action(ActionDescriptor::new("stop-server", json!({"server": "q"})));
    let report = executor().execute(&definition, &mut ctx, &ExecutionOptions::default()).await;

    let failure = report.actions[0].failure.as_ref().expect("action must fail");
    assert_eq!(failure.kind, FailureKind::ServerResolution);
}

#[tokio::test]
async fn server_references_support_interpolation() {
    let server = Arc::new(MockServerEndpoint::new(EndpointName::new("app-1")));
    let endpoints = EndpointRegistry::builder().bind(server.clone() as Arc<dyn Endpoint>).build();
    let mut ctx = TestContext::new("interpolated", endpoints);
    ctx.set_variable("instance", json!("app-1"));

    let definition = TestDefinition::new("interpolated")
        .with_action(ActionDescriptor::new("stop-server", json!({"server": "${instance}"})));
    let report = executor().execute(&definition, &mut ctx, &ExecutionOptions::default()).await;

    assert!(report.passed());
    assert!(!server.is_running());
}

#[tokio::test]
async fn descriptor_without_targets_is_rejected() {
    let endpoints = EndpointRegistry::builder().build();
    let mut ctx = TestContext::new("empty", endpoints);

    let definition = TestDefinition::new("empty")
        .with_action(ActionDescriptor::new("stop-server", json!({})));
    let report = executor().execute(&definition, &mut ctx, &ExecutionOptions::default()).await;

    let failure = report.actions[0].failure.as_ref().expect("action must fail");
    assert_eq!(failure.kind, FailureKind::InvalidDescriptor);
}
