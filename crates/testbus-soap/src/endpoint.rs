//! Queue endpoint that applies SOAP conversion at the transport boundary.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};
use testbus_core::{
    CoreError, CoreResult, Endpoint, EndpointName, Message, TransportMessage,
};
use tokio::sync::{mpsc, Mutex};

use crate::convert::MessageConverter;
use crate::envelope::SoapEnvelopeConverter;

/// In-memory loopback queue carrying wire-form messages. Sends run the
/// outbound conversion, receives the inbound one, so everything on the
/// queue is enveloped exactly as it would be on a real transport.
pub struct SoapQueueEndpoint {
    name: EndpointName,
    converter: Arc<dyn MessageConverter>,
    sender: mpsc::UnboundedSender<TransportMessage>,
    receiver: Mutex<mpsc::UnboundedReceiver<TransportMessage>>,
}

impl SoapQueueEndpoint {
    pub fn new(name: EndpointName, converter: SoapEnvelopeConverter) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            name,
            converter: Arc::new(converter),
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    fn convert_error(&self, err: crate::error::SoapError) -> CoreError {
        CoreError::endpoint(self.name.clone(), err.to_string())
    }
}

#[async_trait]
impl Endpoint for SoapQueueEndpoint {
    fn name(&self) -> &EndpointName {
        &self.name
    }

    fn kind(&self) -> &str {
        "soap-queue"
    }

    async fn send(&self, message: Message) -> CoreResult<()> {
        let transport = self.converter.to_transport(&message).map_err(|e| self.convert_error(e))?;
        self.sender
            .send(transport)
            .map_err(|e| CoreError::endpoint(self.name.clone(), e.to_string()))
    }

    async fn receive(&self, timeout: Duration) -> CoreResult<Message> {
        let mut receiver = self.receiver.lock().await;
        let transport = match tokio::time::timeout(timeout, receiver.recv()).await {
            Ok(Some(transport)) => transport,
            Ok(None) => return Err(CoreError::endpoint(self.name.clone(), "channel closed")),
            Err(_) => return Err(CoreError::ReceiveTimeout(self.name.clone())),
        };
        self.converter.from_transport(&transport).map_err(|e| self.convert_error(e))
    }

    fn metadata(&self) -> HashMap<String, JsonValue> {
        let mut meta = HashMap::new();
        meta.insert("kind".to_string(), json!("soap-queue"));
        meta
    }
}
