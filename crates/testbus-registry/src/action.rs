//! Executable action trait and its result surface.

use async_trait::async_trait;
use testbus_core::{ActionKind, CoreError, FailureKind, TargetReport, TestContext};
use thiserror::Error;

use crate::error::RegistryError;

/// Successful outcome of one action execution. Composite actions carry one
/// target report per referenced endpoint.
#[derive(Debug, Clone, Default)]
pub struct ActionOutcome {
    pub targets: Vec<TargetReport>,
}

impl ActionOutcome {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_targets(targets: Vec<TargetReport>) -> Self {
        Self { targets }
    }
}

/// Classified action failure. Carries the per-target reports collected up
/// to the failure, so composite actions lose nothing on error.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ActionFailure {
    pub kind: FailureKind,
    pub message: String,
    pub targets: Vec<TargetReport>,
}

impl ActionFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), targets: Vec::new() }
    }

    pub fn with_targets(mut self, targets: Vec<TargetReport>) -> Self {
        self.targets = targets;
        self
    }

    pub fn server_resolution(cause: &CoreError) -> Self {
        Self::new(FailureKind::ServerResolution, format!("server resolution failed: {cause}"))
    }

    pub fn server_stop(targets: Vec<TargetReport>) -> Self {
        let failed: Vec<&str> =
            targets.iter().filter(|t| !t.success).map(|t| t.endpoint.as_str()).collect();
        Self::new(
            FailureKind::ServerStop,
            format!("failed to stop server(s): {}", failed.join(", ")),
        )
        .with_targets(targets)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Validation, message)
    }
}

impl From<CoreError> for ActionFailure {
    fn from(err: CoreError) -> Self {
        Self::new(err.failure_kind(), err.to_string())
    }
}

impl From<RegistryError> for ActionFailure {
    fn from(err: RegistryError) -> Self {
        Self::new(err.failure_kind(), err.to_string())
    }
}

/// A single executable test step.
#[async_trait]
pub trait TestAction: Send + Sync {
    /// The action kind this instance was created from.
    fn kind(&self) -> &ActionKind;

    /// Run the action against the shared test context.
    async fn execute(&self, context: &mut TestContext) -> Result<ActionOutcome, ActionFailure>;
}
