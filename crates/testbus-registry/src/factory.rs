//! Factory trait for constructing actions from descriptors.

use serde::de::DeserializeOwned;
use testbus_core::{ActionDescriptor, ActionKind};

use crate::action::TestAction;
use crate::error::{RegistryError, RegistryResult};

/// Describes a registered action kind.
#[derive(Debug, Clone)]
pub struct ActionMetadata {
    pub kind: ActionKind,
    pub description: String,
}

/// Pure constructor for one action kind: given a descriptor, produce an
/// immutable, executable action. No side effects at registration or
/// creation time.
pub trait ActionFactory: Send + Sync {
    /// The action kind this factory handles.
    fn action_kind(&self) -> ActionKind;

    /// Metadata for listings and reports.
    fn metadata(&self) -> ActionMetadata;

    /// Create an action instance from a descriptor.
    fn create(&self, descriptor: &ActionDescriptor) -> RegistryResult<Box<dyn TestAction>>;
}

/// Deserialize a descriptor's configuration into a typed config struct,
/// classifying serde failures as invalid-descriptor errors.
pub fn parse_config<T: DeserializeOwned>(descriptor: &ActionDescriptor) -> RegistryResult<T> {
    serde_json::from_value(descriptor.config.clone())
        .map_err(|e| RegistryError::invalid_descriptor(descriptor.kind.clone(), e.to_string()))
}
