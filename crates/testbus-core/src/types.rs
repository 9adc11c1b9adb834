use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Declarative identifier of an action kind, e.g. "send" or "stop-server".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionKind(pub String);

impl ActionKind {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Logical name under which an endpoint is bound, e.g. "orderQueue".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndpointName(pub String);

impl EndpointName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EndpointName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EndpointName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A single parsed test step: the action kind plus its configuration.
/// Immutable once parsed; factories read it, nothing writes it back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub kind: ActionKind,
    /// Optional display name; defaults to the kind when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Action-specific configuration, interpreted by the matching factory.
    pub config: JsonValue,
}

impl ActionDescriptor {
    pub fn new(kind: impl Into<String>, config: JsonValue) -> Self {
        Self { kind: ActionKind::new(kind), name: None, config }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display name for reports: explicit name, or the kind.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.kind.as_str())
    }
}

/// How the executor reacts to a failed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop after the first failed action (default).
    #[default]
    AbortOnFirstFailure,
    /// Run every action and aggregate all failures.
    CollectAll,
}

/// An ordered test: name, metadata and the action sequence to execute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    pub actions: Vec<ActionDescriptor>,
}

impl TestDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            failure_policy: FailurePolicy::default(),
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, descriptor: ActionDescriptor) -> Self {
        self.actions.push(descriptor);
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}
