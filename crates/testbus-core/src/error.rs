use thiserror::Error;

use crate::types::EndpointName;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("function '{name}' rejected arguments: {reason}")]
    FunctionArguments { name: String, reason: String },

    #[error("no endpoint registered under '{0}'")]
    UnknownEndpoint(EndpointName),

    #[error("endpoint '{0}' has no server capability")]
    NotAServer(EndpointName),

    #[error("endpoint '{name}' failed: {reason}")]
    Endpoint { name: EndpointName, reason: String },

    #[error("receive on '{0}' timed out")]
    ReceiveTimeout(EndpointName),

    #[error("invalid: {0}")]
    Invalid(String),
}

impl CoreError {
    pub fn endpoint(name: EndpointName, reason: impl Into<String>) -> Self {
        Self::Endpoint { name, reason: reason.into() }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}
