//! Base message conversion between logical and transport form.

use encoding_rs::Encoding;
use testbus_core::{Message, Payload, TransportMessage};

use crate::error::{SoapError, SoapResult};

/// Two-direction transform between logical messages and raw transport
/// messages. Both directions are pure functions of (message, configuration);
/// implementations hold no mutable state and are safe to share across
/// concurrent conversions.
pub trait MessageConverter: Send + Sync {
    /// Logical message -> wire form.
    fn to_transport(&self, message: &Message) -> SoapResult<TransportMessage>;

    /// Wire form -> logical message.
    fn from_transport(&self, transport: &TransportMessage) -> SoapResult<Message>;
}

/// Base converter: payload bytes <-> text in a configured charset, headers
/// passed through unchanged.
#[derive(Debug, Clone)]
pub struct PlainTextConverter {
    encoding: &'static Encoding,
}

impl PlainTextConverter {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self { encoding }
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }
}

impl Default for PlainTextConverter {
    fn default() -> Self {
        Self::new(encoding_rs::UTF_8)
    }
}

impl MessageConverter for PlainTextConverter {
    fn to_transport(&self, message: &Message) -> SoapResult<TransportMessage> {
        let text = match &message.payload {
            Payload::Text(text) => text,
            Payload::Binary(_) => {
                return Err(SoapError::encoding(
                    self.encoding.name(),
                    "logical payload is binary, expected text",
                ))
            }
        };
        let (bytes, _, unmappable) = self.encoding.encode(text);
        if unmappable {
            return Err(SoapError::encoding(
                self.encoding.name(),
                "payload contains characters outside the configured charset",
            ));
        }
        let mut transport = TransportMessage::new(bytes.into_owned());
        transport.headers = message.headers.clone();
        Ok(transport)
    }

    fn from_transport(&self, transport: &TransportMessage) -> SoapResult<Message> {
        let (text, _, malformed) = self.encoding.decode(&transport.body);
        if malformed {
            return Err(SoapError::encoding(
                self.encoding.name(),
                "payload bytes are not valid in the configured charset",
            ));
        }
        let mut message = Message::text(text.into_owned());
        message.headers = transport.headers.clone();
        Ok(message)
    }
}
