//! Test definition file loading for TestBus.

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_from_file, manifest_to_definition, parse_content, FileFormat};
pub use schema::{ActionEntry, EndpointConfig, EndpointSpec, TestManifest};
