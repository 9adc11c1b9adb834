//! Error types for the CLI

use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] testbus_config::ConfigError),

    #[error("Registry error: {0}")]
    Registry(#[from] testbus_registry::RegistryError),

    #[error("SOAP converter error: {0}")]
    Soap(#[from] testbus_soap::SoapError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("endpoint '{name}' has unknown kind '{kind}'")]
    UnknownEndpointKind { name: String, kind: String },

    #[error("test '{0}' failed")]
    TestFailed(String),

    #[error("General error: {0}")]
    General(String),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        Self::General(err.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
