//! Pause test execution for a fixed interval.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use testbus_core::{ActionDescriptor, ActionKind, TestContext};
use testbus_registry::{
    parse_config, ActionFactory, ActionFailure, ActionMetadata, ActionOutcome, RegistryResult,
    TestAction,
};

pub const KIND: &str = "sleep";

fn default_duration_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize)]
struct SleepConfig {
    #[serde(default = "default_duration_ms")]
    duration_ms: u64,
}

pub struct SleepAction {
    kind: ActionKind,
    duration: Duration,
}

#[async_trait]
impl TestAction for SleepAction {
    fn kind(&self) -> &ActionKind {
        &self.kind
    }

    async fn execute(&self, context: &mut TestContext) -> Result<ActionOutcome, ActionFailure> {
        tracing::debug!(test = %context.test_name(), duration_ms = self.duration.as_millis() as u64, "sleeping");
        tokio::time::sleep(self.duration).await;
        Ok(ActionOutcome::empty())
    }
}

pub struct SleepActionFactory;

impl ActionFactory for SleepActionFactory {
    fn action_kind(&self) -> ActionKind {
        ActionKind::new(KIND)
    }

    fn metadata(&self) -> ActionMetadata {
        ActionMetadata { kind: self.action_kind(), description: "pause for a fixed interval".into() }
    }

    fn create(&self, descriptor: &ActionDescriptor) -> RegistryResult<Box<dyn TestAction>> {
        let config: SleepConfig = parse_config(descriptor)?;
        Ok(Box::new(SleepAction {
            kind: self.action_kind(),
            duration: Duration::from_millis(config.duration_ms),
        }))
    }
}
