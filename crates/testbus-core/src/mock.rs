//! In-memory endpoint implementations for tests and local runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};
use tokio::sync::{mpsc, Mutex};

use crate::endpoint::{Endpoint, ServerControl};
use crate::error::{CoreError, CoreResult};
use crate::message::Message;
use crate::types::EndpointName;

/// Loopback FIFO endpoint: `send` enqueues, `receive` dequeues.
pub struct MockQueueEndpoint {
    name: EndpointName,
    sender: mpsc::UnboundedSender<Message>,
    receiver: Mutex<mpsc::UnboundedReceiver<Message>>,
}

impl MockQueueEndpoint {
    pub fn new(name: impl Into<EndpointName>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { name: name.into(), sender, receiver: Mutex::new(receiver) }
    }
}

#[async_trait]
impl Endpoint for MockQueueEndpoint {
    fn name(&self) -> &EndpointName {
        &self.name
    }

    fn kind(&self) -> &str {
        "mock-queue"
    }

    async fn send(&self, message: Message) -> CoreResult<()> {
        self.sender
            .send(message)
            .map_err(|e| CoreError::endpoint(self.name.clone(), e.to_string()))
    }

    async fn receive(&self, timeout: Duration) -> CoreResult<Message> {
        let mut receiver = self.receiver.lock().await;
        match tokio::time::timeout(timeout, receiver.recv()).await {
            Ok(Some(message)) => Ok(message),
            Ok(None) => Err(CoreError::endpoint(self.name.clone(), "channel closed")),
            Err(_) => Err(CoreError::ReceiveTimeout(self.name.clone())),
        }
    }

    fn metadata(&self) -> HashMap<String, JsonValue> {
        let mut meta = HashMap::new();
        meta.insert("kind".to_string(), json!("mock-queue"));
        meta
    }
}

/// Server endpoint with a running flag and configurable stop failure.
pub struct MockServerEndpoint {
    name: EndpointName,
    running: AtomicBool,
    fail_on_stop: bool,
    stop_calls: AtomicUsize,
}

impl MockServerEndpoint {
    pub fn new(name: impl Into<EndpointName>) -> Self {
        Self {
            name: name.into(),
            running: AtomicBool::new(true),
            fail_on_stop: false,
            stop_calls: AtomicUsize::new(0),
        }
    }

    /// Make every stop call fail, for exercising failure aggregation.
    pub fn failing_on_stop(mut self) -> Self {
        self.fail_on_stop = true;
        self
    }

    /// Number of stop calls observed.
    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Endpoint for MockServerEndpoint {
    fn name(&self) -> &EndpointName {
        &self.name
    }

    fn kind(&self) -> &str {
        "mock-server"
    }

    async fn send(&self, _message: Message) -> CoreResult<()> {
        Err(CoreError::endpoint(self.name.clone(), "server endpoints do not accept messages"))
    }

    async fn receive(&self, _timeout: Duration) -> CoreResult<Message> {
        Err(CoreError::endpoint(self.name.clone(), "server endpoints do not produce messages"))
    }

    fn as_server(self: Arc<Self>) -> Option<Arc<dyn ServerControl>> {
        Some(self)
    }

    fn metadata(&self) -> HashMap<String, JsonValue> {
        let mut meta = HashMap::new();
        meta.insert("kind".to_string(), json!("mock-server"));
        meta.insert("running".to_string(), json!(self.is_running()));
        meta
    }
}

#[async_trait]
impl ServerControl for MockServerEndpoint {
    fn name(&self) -> &EndpointName {
        &self.name
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn stop(&self) -> CoreResult<()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_stop {
            return Err(CoreError::endpoint(self.name.clone(), "simulated shutdown failure"));
        }
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::EndpointRegistry;

    #[tokio::test]
    async fn queue_delivers_in_order() {
        let queue = MockQueueEndpoint::new(EndpointName::new("q"));
        queue.send(Message::text("first")).await.unwrap();
        queue.send(Message::text("second")).await.unwrap();
        let timeout = Duration::from_millis(100);
        assert_eq!(queue.receive(timeout).await.unwrap(), Message::text("first"));
        assert_eq!(queue.receive(timeout).await.unwrap(), Message::text("second"));
    }

    #[tokio::test]
    async fn empty_queue_times_out() {
        let queue = MockQueueEndpoint::new(EndpointName::new("q"));
        let err = queue.receive(Duration::from_millis(20)).await.unwrap_err();
        assert!(matches!(err, CoreError::ReceiveTimeout(_)));
    }

    #[tokio::test]
    async fn server_stops_and_reports_calls() {
        let server = Arc::new(MockServerEndpoint::new(EndpointName::new("srv")));
        assert!(server.is_running());
        ServerControl::stop(server.as_ref()).await.unwrap();
        assert!(!server.is_running());
        assert_eq!(server.stop_calls(), 1);
    }

    #[tokio::test]
    async fn registry_resolves_server_capability() {
        let server: Arc<dyn Endpoint> = Arc::new(MockServerEndpoint::new(EndpointName::new("srv")));
        let queue: Arc<dyn Endpoint> = Arc::new(MockQueueEndpoint::new(EndpointName::new("q")));
        let registry = EndpointRegistry::builder().bind(server).bind(queue).build();

        assert!(registry.resolve_server(&EndpointName::new("srv")).is_ok());
        let err = registry.resolve_server(&EndpointName::new("q")).err().unwrap();
        assert!(matches!(err, CoreError::NotAServer(_)));
        let err = registry.resolve_server(&EndpointName::new("ghost")).err().unwrap();
        assert!(matches!(err, CoreError::UnknownEndpoint(_)));
    }
}
