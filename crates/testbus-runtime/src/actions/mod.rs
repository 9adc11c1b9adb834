//! Built-in action library.

use std::sync::Arc;

use testbus_registry::ActionRegistry;

pub mod echo;
pub mod messaging;
pub mod sleep;
pub mod stop_server;
pub mod variables;

pub use echo::EchoActionFactory;
pub use messaging::{ReceiveMessageActionFactory, SendMessageActionFactory};
pub use sleep::SleepActionFactory;
pub use stop_server::StopServerActionFactory;
pub use variables::{CreateVariablesActionFactory, TraceVariablesActionFactory};

/// Register every built-in action factory. Matches the
/// [`testbus_registry::ActionRegistrar`] signature so callers can mix it
/// with their own registrars.
pub fn register_builtins(registry: &mut ActionRegistry) {
    registry.register(Arc::new(EchoActionFactory));
    registry.register(Arc::new(SleepActionFactory));
    registry.register(Arc::new(CreateVariablesActionFactory));
    registry.register(Arc::new(TraceVariablesActionFactory));
    registry.register(Arc::new(SendMessageActionFactory));
    registry.register(Arc::new(ReceiveMessageActionFactory));
    registry.register(Arc::new(StopServerActionFactory));
}

/// A fresh registry preloaded with the built-in actions.
pub fn builtin_registry() -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    register_builtins(&mut registry);
    registry
}
