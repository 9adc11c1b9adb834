//! Error types for the action registry

use testbus_core::{ActionKind, CoreError, FailureKind};
use thiserror::Error;

/// Registry-specific errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("action kind '{0}' is not registered")]
    UnknownActionKind(ActionKind),

    #[error("invalid configuration for action '{kind}': {reason}")]
    InvalidDescriptor { kind: ActionKind, reason: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl RegistryError {
    pub fn invalid_descriptor(kind: ActionKind, reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor { kind, reason: reason.into() }
    }

    /// Map onto the failure classification.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::UnknownActionKind(_) => FailureKind::UnknownActionKind,
            Self::InvalidDescriptor { .. } => FailureKind::InvalidDescriptor,
            Self::Core(e) => e.failure_kind(),
        }
    }
}

/// Registry result type
pub type RegistryResult<T> = Result<T, RegistryError>;
