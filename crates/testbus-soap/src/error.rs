//! Error types for SOAP message conversion

use testbus_core::FailureKind;
use thiserror::Error;

pub type SoapResult<T> = Result<T, SoapError>;

#[derive(Debug, Error)]
pub enum SoapError {
    #[error("failed to parse transport payload as a SOAP envelope: {0}")]
    EnvelopeParse(String),

    #[error("failed to serialize payload into a SOAP envelope: {0}")]
    EnvelopeSerialize(String),

    #[error("cannot represent payload in charset '{charset}': {reason}")]
    Encoding { charset: String, reason: String },

    #[error("unknown encoding label '{0}'")]
    UnknownEncoding(String),
}

impl SoapError {
    pub fn envelope_parse(reason: impl Into<String>) -> Self {
        Self::EnvelopeParse(reason.into())
    }

    pub fn envelope_serialize(reason: impl Into<String>) -> Self {
        Self::EnvelopeSerialize(reason.into())
    }

    pub fn encoding(charset: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Encoding { charset: charset.into(), reason: reason.into() }
    }

    /// Map onto the failure classification.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::EnvelopeParse(_) => FailureKind::EnvelopeParse,
            Self::EnvelopeSerialize(_) => FailureKind::EnvelopeSerialize,
            Self::Encoding { .. } | Self::UnknownEncoding(_) => FailureKind::Encoding,
        }
    }
}
