//! Stop one or more server endpoints.

use async_trait::async_trait;
use serde::Deserialize;
use testbus_core::{ActionDescriptor, ActionKind, EndpointName, TargetReport, TestContext};
use testbus_registry::{
    parse_config, ActionFactory, ActionFailure, ActionMetadata, ActionOutcome, RegistryError,
    RegistryResult, TestAction,
};

pub const KIND: &str = "stop-server";

/// Either a single `server` reference, a `servers` list, or both. Order is
/// preserved: the single reference first, then the list.
#[derive(Debug, Clone, Deserialize)]
struct StopServerConfig {
    #[serde(default)]
    server: Option<String>,
    #[serde(default)]
    servers: Vec<String>,
}

pub struct StopServerAction {
    kind: ActionKind,
    targets: Vec<String>,
}

#[async_trait]
impl TestAction for StopServerAction {
    fn kind(&self) -> &ActionKind {
        &self.kind
    }

    async fn execute(&self, context: &mut TestContext) -> Result<ActionOutcome, ActionFailure> {
        // Resolve every reference up front so an unresolvable name fails the
        // action before any server is touched.
        let mut resolved = Vec::with_capacity(self.targets.len());
        for raw in &self.targets {
            let name = EndpointName::new(context.resolve(raw)?);
            let server = context
                .endpoints()
                .resolve_server(&name)
                .map_err(|e| ActionFailure::server_resolution(&e))?;
            resolved.push((name, server));
        }

        // Best effort: attempt every target regardless of earlier failures.
        let mut targets = Vec::with_capacity(resolved.len());
        for (name, server) in resolved {
            match server.stop().await {
                Ok(()) => {
                    tracing::info!(server = %name, "server stopped");
                    targets.push(TargetReport::ok(name));
                }
                Err(e) => {
                    tracing::warn!(server = %name, error = %e, "server failed to stop");
                    targets.push(TargetReport::failed(name, e.to_string()));
                }
            }
        }

        if targets.iter().any(|t| !t.success) {
            Err(ActionFailure::server_stop(targets))
        } else {
            Ok(ActionOutcome::with_targets(targets))
        }
    }
}

pub struct StopServerActionFactory;

impl ActionFactory for StopServerActionFactory {
    fn action_kind(&self) -> ActionKind {
        ActionKind::new(KIND)
    }

    fn metadata(&self) -> ActionMetadata {
        ActionMetadata {
            kind: self.action_kind(),
            description: "stop one or more named server endpoints".into(),
        }
    }

    fn create(&self, descriptor: &ActionDescriptor) -> RegistryResult<Box<dyn TestAction>> {
        let config: StopServerConfig = parse_config(descriptor)?;
        let mut targets: Vec<String> = Vec::new();
        if let Some(server) = config.server {
            targets.push(server);
        }
        targets.extend(config.servers);
        if targets.is_empty() {
            return Err(RegistryError::invalid_descriptor(
                descriptor.kind.clone(),
                "requires a 'server' reference or a non-empty 'servers' list",
            ));
        }
        Ok(Box::new(StopServerAction { kind: self.action_kind(), targets }))
    }
}
