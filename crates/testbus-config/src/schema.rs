//! File schema for declarative test definitions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use testbus_core::{EndpointName, FailurePolicy};

fn default_version() -> String {
    "v1".to_string()
}

/// Top-level test definition file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestManifest {
    /// Version of the file format.
    #[serde(default = "default_version")]
    pub version: String,
    /// Test name, used in reports and logs.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Endpoint bindings, in declaration order.
    #[serde(default)]
    pub endpoints: IndexMap<String, EndpointConfig>,
    /// Ordered action sequence.
    pub actions: Vec<ActionEntry>,
}

/// Declarative endpoint binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Endpoint kind, e.g. "mock-queue" or "soap-queue".
    pub kind: String,
    /// Kind-specific configuration.
    #[serde(flatten)]
    pub config: JsonValue,
}

/// One action step in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionEntry {
    /// Action kind to instantiate.
    pub action: String,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Action-specific configuration.
    #[serde(flatten)]
    pub config: JsonValue,
}

/// Endpoint binding instruction produced from a manifest, consumed by the
/// layer that instantiates concrete endpoints.
#[derive(Debug, Clone)]
pub struct EndpointSpec {
    pub name: EndpointName,
    pub kind: String,
    pub config: JsonValue,
}
