//! Registry mapping action kinds to factories.

use std::collections::HashMap;
use std::sync::Arc;

use testbus_core::{ActionDescriptor, ActionKind};

use crate::action::TestAction;
use crate::error::{RegistryError, RegistryResult};
use crate::factory::{ActionFactory, ActionMetadata};

/// A registrar is a function that registers action factories into the
/// registry. Action libraries self-register through it without the registry
/// knowing their kinds.
pub type ActionRegistrar = fn(&mut ActionRegistry);

/// Maps declarative action kinds to their factories. Populated during
/// setup; read-only while tests execute.
#[derive(Default)]
pub struct ActionRegistry {
    factories: HashMap<ActionKind, Arc<dyn ActionFactory>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under its own kind. A later registration for the
    /// same kind replaces the earlier one.
    pub fn register(&mut self, factory: Arc<dyn ActionFactory>) {
        self.factories.insert(factory.action_kind(), factory);
    }

    /// Apply a set of registrars.
    pub fn apply(&mut self, registrars: &[ActionRegistrar]) {
        for registrar in registrars {
            (registrar)(self);
        }
    }

    pub fn contains(&self, kind: &ActionKind) -> bool {
        self.factories.contains_key(kind)
    }

    /// Create an executable action from a descriptor.
    pub fn create(&self, descriptor: &ActionDescriptor) -> RegistryResult<Box<dyn TestAction>> {
        let factory = self
            .factories
            .get(&descriptor.kind)
            .ok_or_else(|| RegistryError::UnknownActionKind(descriptor.kind.clone()))?;
        factory.create(descriptor)
    }

    pub fn registered_kinds(&self) -> Vec<ActionKind> {
        let mut kinds: Vec<ActionKind> = self.factories.keys().cloned().collect();
        kinds.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        kinds
    }

    /// Metadata for every registered kind, sorted by kind.
    pub fn metadata(&self) -> Vec<ActionMetadata> {
        let mut meta: Vec<ActionMetadata> =
            self.factories.values().map(|f| f.metadata()).collect();
        meta.sort_by(|a, b| a.kind.as_str().cmp(b.kind.as_str()));
        meta
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry").field("kinds", &self.registered_kinds()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionFailure, ActionOutcome};
    use async_trait::async_trait;
    use serde_json::json;
    use testbus_core::TestContext;

    struct NoopAction {
        kind: ActionKind,
    }

    #[async_trait]
    impl TestAction for NoopAction {
        fn kind(&self) -> &ActionKind {
            &self.kind
        }

        async fn execute(
            &self,
            _context: &mut TestContext,
        ) -> Result<ActionOutcome, ActionFailure> {
            Ok(ActionOutcome::empty())
        }
    }

    struct NoopFactory;

    impl ActionFactory for NoopFactory {
        fn action_kind(&self) -> ActionKind {
            ActionKind::new("noop")
        }

        fn metadata(&self) -> ActionMetadata {
            ActionMetadata { kind: self.action_kind(), description: "does nothing".into() }
        }

        fn create(&self, descriptor: &ActionDescriptor) -> RegistryResult<Box<dyn TestAction>> {
            if !descriptor.config.is_null() && !descriptor.config.is_object() {
                return Err(RegistryError::invalid_descriptor(
                    descriptor.kind.clone(),
                    "expected an object",
                ));
            }
            Ok(Box::new(NoopAction { kind: self.action_kind() }))
        }
    }

    #[test]
    fn unknown_kind_is_classified() {
        let registry = ActionRegistry::new();
        let descriptor = ActionDescriptor::new("ghost", json!({}));
        let err = registry.create(&descriptor).err().unwrap();
        assert!(matches!(err, RegistryError::UnknownActionKind(_)));
        assert_eq!(err.failure_kind(), testbus_core::FailureKind::UnknownActionKind);
    }

    #[test]
    fn registered_factory_creates_actions() {
        let mut registry = ActionRegistry::new();
        registry.register(Arc::new(NoopFactory));

        assert!(registry.contains(&ActionKind::new("noop")));
        let action = registry.create(&ActionDescriptor::new("noop", json!({}))).unwrap();
        assert_eq!(action.kind().as_str(), "noop");
    }

    #[test]
    fn factory_rejections_are_invalid_descriptor() {
        let mut registry = ActionRegistry::new();
        registry.register(Arc::new(NoopFactory));

        let err = registry.create(&ActionDescriptor::new("noop", json!("scalar"))).err().unwrap();
        assert_eq!(err.failure_kind(), testbus_core::FailureKind::InvalidDescriptor);
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let mut registry = ActionRegistry::new();
        registry.register(Arc::new(NoopFactory));
        registry.register(Arc::new(NoopFactory));
        assert_eq!(registry.registered_kinds().len(), 1);
    }
}
