//! Execution reports: per-action results aggregated into a test verdict.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use testbus_core::{ActionKind, FailureKind, TargetReport};

/// Outcome of a single executed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionStatus {
    Passed,
    Failed,
}

/// Classified cause of a failed action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

/// Result of one attempted action, in execution order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionReport {
    /// Position in the test's action sequence.
    pub index: usize,
    pub kind: ActionKind,
    pub name: String,
    pub status: ActionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
    /// Per-target outcomes for composite actions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<TargetReport>,
    pub duration_ms: u64,
}

impl ActionReport {
    pub fn passed(&self) -> bool {
        self.status == ActionStatus::Passed
    }
}

/// Overall test verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    Passed,
    Failed,
}

/// Complete, ordered record of one test execution: exactly the actions
/// attempted, with attribution of what failed and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestReport {
    pub test_name: String,
    pub execution_id: String,
    pub verdict: Verdict,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub actions: Vec<ActionReport>,
}

impl TestReport {
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Passed
    }

    pub fn failed_actions(&self) -> impl Iterator<Item = &ActionReport> {
        self.actions.iter().filter(|a| !a.passed())
    }
}
