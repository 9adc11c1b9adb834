//! Send and receive messages through resolved endpoints.

use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use testbus_core::{
    headers, ActionDescriptor, ActionKind, EndpointName, Message, TestContext,
};
use testbus_registry::{
    parse_config, ActionFactory, ActionFailure, ActionMetadata, ActionOutcome, RegistryResult,
    TestAction,
};

pub const SEND_KIND: &str = "send";
pub const RECEIVE_KIND: &str = "receive";

fn default_receive_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
struct SendConfig {
    endpoint: String,
    payload: String,
    #[serde(default)]
    headers: IndexMap<String, String>,
}

/// Interpolate payload and headers, then send through the named endpoint.
pub struct SendMessageAction {
    kind: ActionKind,
    endpoint: String,
    payload: String,
    headers: IndexMap<String, String>,
}

#[async_trait]
impl TestAction for SendMessageAction {
    fn kind(&self) -> &ActionKind {
        &self.kind
    }

    async fn execute(&self, context: &mut TestContext) -> Result<ActionOutcome, ActionFailure> {
        let name = EndpointName::new(context.resolve(&self.endpoint)?);
        let endpoint = context.endpoints().resolve(&name)?;

        let mut message = Message::text(context.resolve(&self.payload)?);
        for (header, value) in &self.headers {
            message.set_header(header.clone(), context.resolve(value)?);
        }

        tracing::info!(
            test = %context.test_name(),
            endpoint = %name,
            payload_len = message.payload.len(),
            "sending message"
        );
        endpoint.send(message).await?;
        Ok(ActionOutcome::empty())
    }
}

pub struct SendMessageActionFactory;

impl ActionFactory for SendMessageActionFactory {
    fn action_kind(&self) -> ActionKind {
        ActionKind::new(SEND_KIND)
    }

    fn metadata(&self) -> ActionMetadata {
        ActionMetadata {
            kind: self.action_kind(),
            description: "send a message through a named endpoint".into(),
        }
    }

    fn create(&self, descriptor: &ActionDescriptor) -> RegistryResult<Box<dyn TestAction>> {
        let config: SendConfig = parse_config(descriptor)?;
        Ok(Box::new(SendMessageAction {
            kind: self.action_kind(),
            endpoint: config.endpoint,
            payload: config.payload,
            headers: config.headers,
        }))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ReceiveConfig {
    endpoint: String,
    #[serde(default = "default_receive_timeout_ms")]
    timeout_ms: u64,
    #[serde(default)]
    expect_payload: Option<String>,
    #[serde(default)]
    expect_headers: IndexMap<String, String>,
}

/// Receive the next message from the named endpoint, store it into context
/// variables and match it against the configured expectations.
pub struct ReceiveMessageAction {
    kind: ActionKind,
    endpoint: String,
    timeout: Duration,
    expect_payload: Option<String>,
    expect_headers: IndexMap<String, String>,
}

#[async_trait]
impl TestAction for ReceiveMessageAction {
    fn kind(&self) -> &ActionKind {
        &self.kind
    }

    async fn execute(&self, context: &mut TestContext) -> Result<ActionOutcome, ActionFailure> {
        let name = EndpointName::new(context.resolve(&self.endpoint)?);
        let endpoint = context.endpoints().resolve(&name)?;

        let message = endpoint.receive(self.timeout).await?;
        tracing::info!(
            test = %context.test_name(),
            endpoint = %name,
            payload_len = message.payload.len(),
            "received message"
        );

        // Capture before validating, so failed expectations can still be
        // inspected through the context.
        if let Some(text) = message.payload_text() {
            context.set_variable(headers::RECEIVED_PAYLOAD, JsonValue::String(text.to_string()));
        }
        for (header, value) in &message.headers {
            context.set_variable(
                format!("{}{}", headers::RECEIVED_HEADER_PREFIX, header),
                JsonValue::String(value.clone()),
            );
        }

        if let Some(expected) = &self.expect_payload {
            let expected = context.resolve(expected)?;
            let actual = message.payload_text().ok_or_else(|| {
                ActionFailure::validation(format!(
                    "expected text payload on '{name}', received binary payload"
                ))
            })?;
            if actual != expected {
                return Err(ActionFailure::validation(format!(
                    "payload mismatch on '{name}': expected '{expected}', received '{actual}'"
                )));
            }
        }
        for (header, expected) in &self.expect_headers {
            let expected = context.resolve(expected)?;
            match message.header(header) {
                Some(actual) if actual == expected => {}
                Some(actual) => {
                    return Err(ActionFailure::validation(format!(
                        "header '{header}' mismatch on '{name}': expected '{expected}', received '{actual}'"
                    )));
                }
                None => {
                    return Err(ActionFailure::validation(format!(
                        "missing header '{header}' on message from '{name}'"
                    )));
                }
            }
        }

        Ok(ActionOutcome::empty())
    }
}

pub struct ReceiveMessageActionFactory;

impl ActionFactory for ReceiveMessageActionFactory {
    fn action_kind(&self) -> ActionKind {
        ActionKind::new(RECEIVE_KIND)
    }

    fn metadata(&self) -> ActionMetadata {
        ActionMetadata {
            kind: self.action_kind(),
            description: "receive and validate a message from a named endpoint".into(),
        }
    }

    fn create(&self, descriptor: &ActionDescriptor) -> RegistryResult<Box<dyn TestAction>> {
        let config: ReceiveConfig = parse_config(descriptor)?;
        Ok(Box::new(ReceiveMessageAction {
            kind: self.action_kind(),
            endpoint: config.endpoint,
            timeout: Duration::from_millis(config.timeout_ms),
            expect_payload: config.expect_payload,
            expect_headers: config.expect_headers,
        }))
    }
}
