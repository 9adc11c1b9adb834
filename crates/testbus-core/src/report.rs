//! Classified failure causes and per-target outcomes.
//!
//! Every error a test action can surface maps onto exactly one
//! [`FailureKind`], so reporting layers never see an unclassified failure.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::EndpointName;

/// Classification of an action failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// The action kind was never registered.
    UnknownActionKind,
    /// The descriptor configuration was rejected by the factory.
    InvalidDescriptor,
    /// A referenced endpoint name has no binding.
    UnknownEndpoint,
    /// A stop-server target could not be resolved to a server endpoint.
    ServerResolution,
    /// One or more stop-server targets failed to shut down.
    ServerStop,
    /// An envelope payload could not be parsed.
    EnvelopeParse,
    /// A payload could not be serialized into an envelope.
    EnvelopeSerialize,
    /// Payload bytes could not be decoded or encoded in the configured charset.
    Encoding,
    /// A received message did not match expectations.
    Validation,
    /// An endpoint operation failed.
    Endpoint,
    /// The per-action timeout expired.
    Timeout,
    /// Variable or function resolution failed.
    Resolution,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::UnknownActionKind => "unknown-action-kind",
            Self::InvalidDescriptor => "invalid-descriptor",
            Self::UnknownEndpoint => "unknown-endpoint",
            Self::ServerResolution => "server-resolution",
            Self::ServerStop => "server-stop",
            Self::EnvelopeParse => "envelope-parse",
            Self::EnvelopeSerialize => "envelope-serialize",
            Self::Encoding => "encoding",
            Self::Validation => "validation",
            Self::Endpoint => "endpoint",
            Self::Timeout => "timeout",
            Self::Resolution => "resolution",
        };
        f.write_str(s)
    }
}

impl CoreError {
    /// Map a core error onto its failure classification.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            CoreError::UnknownVariable(_)
            | CoreError::UnknownFunction(_)
            | CoreError::FunctionArguments { .. } => FailureKind::Resolution,
            CoreError::UnknownEndpoint(_) => FailureKind::UnknownEndpoint,
            CoreError::NotAServer(_) => FailureKind::ServerResolution,
            CoreError::Endpoint { .. } | CoreError::ReceiveTimeout(_) => FailureKind::Endpoint,
            CoreError::Invalid(_) => FailureKind::InvalidDescriptor,
        }
    }
}

/// Outcome of one target inside a composite action, e.g. a single server
/// within a stop-server step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetReport {
    pub endpoint: EndpointName,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TargetReport {
    pub fn ok(endpoint: EndpointName) -> Self {
        Self { endpoint, success: true, error: None }
    }

    pub fn failed(endpoint: EndpointName, error: impl Into<String>) -> Self {
        Self { endpoint, success: false, error: Some(error.into()) }
    }
}
