//! Log a message, with placeholder interpolation.

use async_trait::async_trait;
use serde::Deserialize;
use testbus_core::{ActionDescriptor, ActionKind, TestContext};
use testbus_registry::{
    parse_config, ActionFactory, ActionFailure, ActionMetadata, ActionOutcome, RegistryResult,
    TestAction,
};

pub const KIND: &str = "echo";

#[derive(Debug, Clone, Deserialize)]
struct EchoConfig {
    message: String,
}

pub struct EchoAction {
    kind: ActionKind,
    message: String,
}

#[async_trait]
impl TestAction for EchoAction {
    fn kind(&self) -> &ActionKind {
        &self.kind
    }

    async fn execute(&self, context: &mut TestContext) -> Result<ActionOutcome, ActionFailure> {
        let message = context.resolve(&self.message)?;
        tracing::info!(test = %context.test_name(), "{message}");
        Ok(ActionOutcome::empty())
    }
}

pub struct EchoActionFactory;

impl ActionFactory for EchoActionFactory {
    fn action_kind(&self) -> ActionKind {
        ActionKind::new(KIND)
    }

    fn metadata(&self) -> ActionMetadata {
        ActionMetadata { kind: self.action_kind(), description: "log an interpolated message".into() }
    }

    fn create(&self, descriptor: &ActionDescriptor) -> RegistryResult<Box<dyn TestAction>> {
        let config: EchoConfig = parse_config(descriptor)?;
        Ok(Box::new(EchoAction { kind: self.action_kind(), message: config.message }))
    }
}
