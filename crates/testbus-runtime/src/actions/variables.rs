//! Create and trace context variables.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use testbus_core::{ActionDescriptor, ActionKind, TestContext};
use testbus_registry::{
    parse_config, ActionFactory, ActionFailure, ActionMetadata, ActionOutcome, RegistryResult,
    TestAction,
};

pub const CREATE_KIND: &str = "create-variables";
pub const TRACE_KIND: &str = "trace-variables";

#[derive(Debug, Clone, Deserialize)]
struct CreateVariablesConfig {
    variables: IndexMap<String, JsonValue>,
}

/// Store variables into the context. String values are interpolated first,
/// so new variables may be derived from existing ones.
pub struct CreateVariablesAction {
    kind: ActionKind,
    variables: IndexMap<String, JsonValue>,
}

#[async_trait]
impl TestAction for CreateVariablesAction {
    fn kind(&self) -> &ActionKind {
        &self.kind
    }

    async fn execute(&self, context: &mut TestContext) -> Result<ActionOutcome, ActionFailure> {
        for (name, value) in &self.variables {
            let value = match value {
                JsonValue::String(s) => JsonValue::String(context.resolve(s)?),
                other => other.clone(),
            };
            tracing::debug!(test = %context.test_name(), variable = %name, "setting variable");
            context.set_variable(name.clone(), value);
        }
        Ok(ActionOutcome::empty())
    }
}

pub struct CreateVariablesActionFactory;

impl ActionFactory for CreateVariablesActionFactory {
    fn action_kind(&self) -> ActionKind {
        ActionKind::new(CREATE_KIND)
    }

    fn metadata(&self) -> ActionMetadata {
        ActionMetadata {
            kind: self.action_kind(),
            description: "store variables into the test context".into(),
        }
    }

    fn create(&self, descriptor: &ActionDescriptor) -> RegistryResult<Box<dyn TestAction>> {
        let config: CreateVariablesConfig = parse_config(descriptor)?;
        Ok(Box::new(CreateVariablesAction {
            kind: self.action_kind(),
            variables: config.variables,
        }))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TraceVariablesConfig {
    /// Names to trace; all variables when absent.
    #[serde(default)]
    variables: Option<Vec<String>>,
}

pub struct TraceVariablesAction {
    kind: ActionKind,
    variables: Option<Vec<String>>,
}

#[async_trait]
impl TestAction for TraceVariablesAction {
    fn kind(&self) -> &ActionKind {
        &self.kind
    }

    async fn execute(&self, context: &mut TestContext) -> Result<ActionOutcome, ActionFailure> {
        match &self.variables {
            Some(names) => {
                for name in names {
                    let value = context.variable_text(name)?;
                    tracing::info!(test = %context.test_name(), "{name} = {value}");
                }
            }
            None => {
                let mut names = context.variable_names();
                names.sort_unstable();
                for name in names {
                    // Listed names always resolve.
                    let value = context.variable_text(name).unwrap_or_default();
                    tracing::info!(test = %context.test_name(), "{name} = {value}");
                }
            }
        }
        Ok(ActionOutcome::empty())
    }
}

pub struct TraceVariablesActionFactory;

impl ActionFactory for TraceVariablesActionFactory {
    fn action_kind(&self) -> ActionKind {
        ActionKind::new(TRACE_KIND)
    }

    fn metadata(&self) -> ActionMetadata {
        ActionMetadata {
            kind: self.action_kind(),
            description: "log selected or all context variables".into(),
        }
    }

    fn create(&self, descriptor: &ActionDescriptor) -> RegistryResult<Box<dyn TestAction>> {
        let config: TraceVariablesConfig = parse_config(descriptor)?;
        Ok(Box::new(TraceVariablesAction {
            kind: self.action_kind(),
            variables: config.variables,
        }))
    }
}
