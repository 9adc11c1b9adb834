//! Core types, test context and endpoint model for TestBus.

pub mod context;
pub mod endpoint;
pub mod error;
pub mod functions;
pub mod message;
pub mod mock;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use context::TestContext;
pub use endpoint::{Endpoint, EndpointRegistry, EndpointRegistryBuilder, ServerControl};
pub use error::{CoreError, CoreResult};
pub use functions::{FunctionRegistry, TestFunction};
pub use message::{headers, Message, Payload, TransportMessage};
pub use report::{FailureKind, TargetReport};
pub use types::{ActionDescriptor, ActionKind, EndpointName, FailurePolicy, TestDefinition};
