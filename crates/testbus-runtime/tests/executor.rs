use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use testbus_core::mock::MockQueueEndpoint;
use testbus_core::{
    headers, ActionDescriptor, Endpoint, EndpointName, EndpointRegistry, FailureKind,
    FailurePolicy, TestContext, TestDefinition,
};
use testbus_runtime::{builtin_registry, ActionExecutor, ActionStatus, ExecutionOptions};

fn executor() -> ActionExecutor {
    ActionExecutor::new(Arc::new(builtin_registry()))
}

fn queue_context(test: &str, queue_name: &str) -> TestContext {
    let queue = Arc::new(MockQueueEndpoint::new(EndpointName::new(queue_name)));
    let endpoints = EndpointRegistry::builder().bind(queue as Arc<dyn Endpoint>).build();
    TestContext::new(test, endpoints)
}

#[tokio::test]
async fn unknown_action_kind_is_a_classified_failure() {
    let mut ctx = queue_context("unknown-kind", "q");
    let definition = TestDefinition::new("unknown-kind")
        .with_action(ActionDescriptor::new("teleport", json!({})));

    let report = executor().execute(&definition, &mut ctx, &ExecutionOptions::default()).await;

    assert!(!report.passed());
    let failure = report.actions[0].failure.as_ref().expect("must fail");
    assert_eq!(failure.kind, FailureKind::UnknownActionKind);
    assert!(failure.message.contains("teleport"));
}

#[tokio::test]
async fn abort_policy_records_only_attempted_actions() {
    let mut ctx = queue_context("abort", "q");
    let definition = TestDefinition::new("abort")
        .with_action(ActionDescriptor::new("echo", json!({"message": "one"})))
        .with_action(ActionDescriptor::new("echo", json!({"message": "${missing}"})))
        .with_action(ActionDescriptor::new("echo", json!({"message": "three"})));

    let report = executor().execute(&definition, &mut ctx, &ExecutionOptions::default()).await;

    assert_eq!(report.actions.len(), 2);
    assert_eq!(report.actions[0].status, ActionStatus::Passed);
    assert_eq!(report.actions[1].status, ActionStatus::Failed);
    assert_eq!(report.actions[1].index, 1);
}

#[tokio::test]
async fn collect_all_policy_attempts_every_action() {
    let mut ctx = queue_context("collect", "q");
    let definition = TestDefinition::new("collect")
        .with_policy(FailurePolicy::CollectAll)
        .with_action(ActionDescriptor::new("echo", json!({"message": "${missing}"})))
        .with_action(ActionDescriptor::new("echo", json!({"message": "still runs"})));

    let report = executor().execute(&definition, &mut ctx, &ExecutionOptions::default()).await;

    assert!(!report.passed());
    assert_eq!(report.actions.len(), 2);
    assert_eq!(report.actions[1].status, ActionStatus::Passed);
}

#[tokio::test]
async fn options_policy_overrides_definition() {
    let mut ctx = queue_context("override", "q");
    let definition = TestDefinition::new("override")
        .with_action(ActionDescriptor::new("echo", json!({"message": "${missing}"})))
        .with_action(ActionDescriptor::new("echo", json!({"message": "second"})));

    let options =
        ExecutionOptions { policy: Some(FailurePolicy::CollectAll), ..Default::default() };
    let report = executor().execute(&definition, &mut ctx, &options).await;

    assert_eq!(report.actions.len(), 2);
}

#[tokio::test]
async fn send_then_receive_validates_payload_and_headers() {
    let mut ctx = queue_context("loopback", "orders");
    ctx.set_variable("order_id", json!("42"));

    let definition = TestDefinition::new("loopback")
        .with_action(ActionDescriptor::new(
            "send",
            json!({
                "endpoint": "orders",
                "payload": "<order id=\"${order_id}\"/>",
                "headers": {"operation": "create"}
            }),
        ))
        .with_action(ActionDescriptor::new(
            "receive",
            json!({
                "endpoint": "orders",
                "timeout_ms": 500,
                "expect_payload": "<order id=\"42\"/>",
                "expect_headers": {"operation": "create"}
            }),
        ));

    let report = executor().execute(&definition, &mut ctx, &ExecutionOptions::default()).await;

    assert!(report.passed(), "report: {report:?}");
    assert_eq!(
        ctx.get_variable(headers::RECEIVED_PAYLOAD),
        Some(&json!("<order id=\"42\"/>"))
    );
    assert_eq!(
        ctx.get_variable(&format!("{}operation", headers::RECEIVED_HEADER_PREFIX)),
        Some(&json!("create"))
    );
}

#[tokio::test]
async fn payload_mismatch_is_a_validation_failure() {
    let mut ctx = queue_context("mismatch", "q");
    let definition = TestDefinition::new("mismatch")
        .with_action(
            ActionDescriptor::new("send", json!({"endpoint": "q", "payload": "actual"})),
        )
        .with_action(ActionDescriptor::new(
            "receive",
            json!({"endpoint": "q", "timeout_ms": 500, "expect_payload": "expected"}),
        ));

    let report = executor().execute(&definition, &mut ctx, &ExecutionOptions::default()).await;

    let failure = report.actions[1].failure.as_ref().expect("must fail");
    assert_eq!(failure.kind, FailureKind::Validation);
    assert!(failure.message.contains("expected"));
    assert!(failure.message.contains("actual"));
}

#[tokio::test]
async fn receive_on_empty_queue_fails_with_endpoint_error() {
    let mut ctx = queue_context("empty-receive", "q");
    let definition = TestDefinition::new("empty-receive").with_action(ActionDescriptor::new(
        "receive",
        json!({"endpoint": "q", "timeout_ms": 20}),
    ));

    let report = executor().execute(&definition, &mut ctx, &ExecutionOptions::default()).await;

    let failure = report.actions[0].failure.as_ref().expect("must fail");
    assert_eq!(failure.kind, FailureKind::Endpoint);
}

#[tokio::test]
async fn send_to_unknown_endpoint_leaves_context_untouched() {
    let mut ctx = queue_context("unknown-endpoint", "q");
    let before = ctx.variable_names().len();

    let definition = TestDefinition::new("unknown-endpoint").with_action(ActionDescriptor::new(
        "send",
        json!({"endpoint": "ghost", "payload": "x"}),
    ));
    let report = executor().execute(&definition, &mut ctx, &ExecutionOptions::default()).await;

    let failure = report.actions[0].failure.as_ref().expect("must fail");
    assert_eq!(failure.kind, FailureKind::UnknownEndpoint);
    assert_eq!(ctx.variable_names().len(), before);
}

#[tokio::test]
async fn per_action_timeout_is_classified() {
    let mut ctx = queue_context("timeout", "q");
    let definition = TestDefinition::new("timeout")
        .with_action(ActionDescriptor::new("sleep", json!({"duration_ms": 500})));

    let options = ExecutionOptions {
        action_timeout: Some(Duration::from_millis(30)),
        ..Default::default()
    };
    let report = executor().execute(&definition, &mut ctx, &options).await;

    let failure = report.actions[0].failure.as_ref().expect("must fail");
    assert_eq!(failure.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn create_variables_feed_later_actions() {
    let mut ctx = queue_context("variables", "q");
    let definition = TestDefinition::new("variables")
        .with_action(ActionDescriptor::new(
            "create-variables",
            json!({"variables": {"greeting": "hello", "loud": "${upper(greeting)}"}}),
        ))
        .with_action(ActionDescriptor::new("echo", json!({"message": "${loud}"})))
        .with_action(ActionDescriptor::new(
            "trace-variables",
            json!({"variables": ["greeting", "loud"]}),
        ));

    let report = executor().execute(&definition, &mut ctx, &ExecutionOptions::default()).await;

    assert!(report.passed(), "report: {report:?}");
    assert_eq!(ctx.get_variable("loud"), Some(&json!("HELLO")));
}
