//! Endpoint traits and the read-only endpoint registry.
//!
//! An endpoint is a logical handle to a transport resource. TestBus holds
//! only the handle; transport state lives behind the trait. Bindings are
//! established once through [`EndpointRegistryBuilder`] before execution and
//! are immutable afterwards, so resolution is safe from concurrent runs.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::{CoreError, CoreResult};
use crate::message::Message;
use crate::types::EndpointName;

/// Logical handle to a message endpoint.
#[async_trait]
pub trait Endpoint: Send + Sync {
    /// The name this endpoint is bound under.
    fn name(&self) -> &EndpointName;

    /// Endpoint kind, e.g. "mock-queue".
    fn kind(&self) -> &str;

    /// Send a message to the resource behind this endpoint.
    async fn send(&self, message: Message) -> CoreResult<()>;

    /// Receive the next message, waiting up to `timeout`.
    async fn receive(&self, timeout: Duration) -> CoreResult<Message>;

    /// Server-capable endpoints return their shutdown handle.
    fn as_server(self: Arc<Self>) -> Option<Arc<dyn ServerControl>> {
        None
    }

    /// Endpoint metadata for debugging and reports.
    fn metadata(&self) -> HashMap<String, JsonValue> {
        HashMap::new()
    }
}

/// Shutdown capability of a server endpoint.
#[async_trait]
pub trait ServerControl: Send + Sync {
    fn name(&self) -> &EndpointName;

    fn is_running(&self) -> bool;

    /// Stop the server. Idempotent: stopping a stopped server succeeds.
    async fn stop(&self) -> CoreResult<()>;
}

/// Immutable mapping from logical endpoint names to live endpoint handles.
#[derive(Clone, Default)]
pub struct EndpointRegistry {
    bindings: Arc<HashMap<EndpointName, Arc<dyn Endpoint>>>,
}

impl EndpointRegistry {
    pub fn builder() -> EndpointRegistryBuilder {
        EndpointRegistryBuilder::default()
    }

    /// Resolve a logical name to its endpoint handle.
    pub fn resolve(&self, name: &EndpointName) -> CoreResult<Arc<dyn Endpoint>> {
        self.bindings
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::UnknownEndpoint(name.clone()))
    }

    /// Resolve a logical name to a server handle. Fails with
    /// [`CoreError::NotAServer`] when the binding exists but cannot be
    /// shut down.
    pub fn resolve_server(&self, name: &EndpointName) -> CoreResult<Arc<dyn ServerControl>> {
        let endpoint = self.resolve(name)?;
        endpoint.as_server().ok_or_else(|| CoreError::NotAServer(name.clone()))
    }

    pub fn contains(&self, name: &EndpointName) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn names(&self) -> Vec<EndpointName> {
        self.bindings.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl std::fmt::Debug for EndpointRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointRegistry").field("bindings", &self.names()).finish()
    }
}

/// Builder for [`EndpointRegistry`]. Consumed by `build`, after which the
/// bindings cannot change.
#[derive(Default)]
pub struct EndpointRegistryBuilder {
    bindings: HashMap<EndpointName, Arc<dyn Endpoint>>,
}

impl EndpointRegistryBuilder {
    /// Bind an endpoint under its own name. A later binding for the same
    /// name replaces the earlier one.
    pub fn bind(mut self, endpoint: Arc<dyn Endpoint>) -> Self {
        self.bindings.insert(endpoint.name().clone(), endpoint);
        self
    }

    pub fn build(self) -> EndpointRegistry {
        EndpointRegistry { bindings: Arc::new(self.bindings) }
    }
}
