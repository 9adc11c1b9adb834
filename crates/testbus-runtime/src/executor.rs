//! Sequential action executor.

use std::sync::Arc;
use std::time::Duration;

use testbus_core::{FailureKind, FailurePolicy, TestContext, TestDefinition};
use testbus_registry::{ActionFailure, ActionRegistry};

use crate::report::{ActionReport, ActionStatus, Failure, TestReport, Verdict};

/// Options for a test execution.
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Overrides the definition's failure policy when set.
    pub policy: Option<FailurePolicy>,
    /// Per-action timeout; expiry is recorded as a timeout failure.
    pub action_timeout: Option<Duration>,
}

/// Runs an ordered sequence of actions against a test context.
///
/// Execution is sequential; one context never sees more than one in-flight
/// action. The registry is read-only here, so one executor may serve many
/// concurrent runs, each with its own context.
pub struct ActionExecutor {
    registry: Arc<ActionRegistry>,
}

impl ActionExecutor {
    pub fn new(registry: Arc<ActionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Execute every action of `definition` in order, honoring the failure
    /// policy. The returned report lists exactly the actions attempted.
    pub async fn execute(
        &self,
        definition: &TestDefinition,
        context: &mut TestContext,
        options: &ExecutionOptions,
    ) -> TestReport {
        let policy = options.policy.unwrap_or(definition.failure_policy);
        let started_at = chrono::Utc::now();
        let run_start = std::time::Instant::now();

        tracing::info!(
            test = %definition.name,
            execution_id = %context.execution_id(),
            actions = definition.actions.len(),
            ?policy,
            "starting test execution"
        );

        let mut reports = Vec::with_capacity(definition.actions.len());
        for (index, descriptor) in definition.actions.iter().enumerate() {
            let action_start = std::time::Instant::now();
            let result = match self.registry.create(descriptor) {
                Ok(action) => {
                    let future = action.execute(context);
                    match options.action_timeout {
                        Some(limit) => match tokio::time::timeout(limit, future).await {
                            Ok(result) => result,
                            Err(_) => Err(ActionFailure::new(
                                FailureKind::Timeout,
                                format!("action timed out after {}ms", limit.as_millis()),
                            )),
                        },
                        None => future.await,
                    }
                }
                Err(e) => {
                    let kind = e.failure_kind();
                    Err(ActionFailure::new(kind, e.to_string()))
                }
            };
            let duration_ms = action_start.elapsed().as_millis() as u64;

            let report = match result {
                Ok(outcome) => {
                    tracing::info!(
                        test = %definition.name,
                        action = %descriptor.display_name(),
                        index,
                        duration_ms,
                        "action passed"
                    );
                    ActionReport {
                        index,
                        kind: descriptor.kind.clone(),
                        name: descriptor.display_name().to_string(),
                        status: ActionStatus::Passed,
                        failure: None,
                        targets: outcome.targets,
                        duration_ms,
                    }
                }
                Err(failure) => {
                    tracing::error!(
                        test = %definition.name,
                        action = %descriptor.display_name(),
                        index,
                        duration_ms,
                        failure_kind = %failure.kind,
                        error = %failure.message,
                        "action failed"
                    );
                    ActionReport {
                        index,
                        kind: descriptor.kind.clone(),
                        name: descriptor.display_name().to_string(),
                        status: ActionStatus::Failed,
                        failure: Some(Failure { kind: failure.kind, message: failure.message }),
                        targets: failure.targets,
                        duration_ms,
                    }
                }
            };

            let failed = !report.passed();
            reports.push(report);
            if failed && policy == FailurePolicy::AbortOnFirstFailure {
                tracing::warn!(
                    test = %definition.name,
                    attempted = reports.len(),
                    remaining = definition.actions.len() - reports.len(),
                    "aborting on first failure"
                );
                break;
            }
        }

        let verdict =
            if reports.iter().all(ActionReport::passed) { Verdict::Passed } else { Verdict::Failed };
        let duration_ms = run_start.elapsed().as_millis() as u64;

        tracing::info!(
            test = %definition.name,
            execution_id = %context.execution_id(),
            ?verdict,
            duration_ms,
            "test execution finished"
        );

        TestReport {
            test_name: definition.name.clone(),
            execution_id: context.execution_id().to_string(),
            verdict,
            started_at,
            duration_ms,
            actions: reports,
        }
    }
}
