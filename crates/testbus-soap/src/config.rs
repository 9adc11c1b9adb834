//! Converter configuration.

use encoding_rs::Encoding;
use testbus_core::headers;

use crate::error::{SoapError, SoapResult};

/// Transport-specific SOAP action header, as used by SOAP-over-JMS.
pub const DEFAULT_TRANSPORT_ACTION_HEADER: &str = "SOAPJMS_soapAction";

/// Options recognized by the SOAP converters.
#[derive(Debug, Clone)]
pub struct SoapConverterConfig {
    /// Charset used to decode and encode transport payload bytes.
    pub text_encoding: &'static Encoding,
    /// Transport-specific header key carrying the SOAP action.
    pub transport_action_header: String,
    /// Fixed namespaced key for the SOAP action on logical messages.
    pub logical_action_header: String,
}

impl Default for SoapConverterConfig {
    fn default() -> Self {
        Self {
            text_encoding: encoding_rs::UTF_8,
            transport_action_header: DEFAULT_TRANSPORT_ACTION_HEADER.to_string(),
            logical_action_header: headers::SOAP_ACTION.to_string(),
        }
    }
}

impl SoapConverterConfig {
    /// Configuration with the charset looked up by its WHATWG label,
    /// e.g. "utf-8" or "iso-8859-1".
    pub fn with_encoding_label(label: &str) -> SoapResult<Self> {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| SoapError::UnknownEncoding(label.to_string()))?;
        Ok(Self { text_encoding: encoding, ..Self::default() })
    }

    pub fn transport_action_header(mut self, header: impl Into<String>) -> Self {
        self.transport_action_header = header.into();
        self
    }
}
