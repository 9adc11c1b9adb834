//! Logical and transport-side message model.
//!
//! A [`Message`] is what actions and validation logic see; a
//! [`TransportMessage`] is the raw wire form a converter produces or
//! consumes. Header names carry the `testbus_` prefix when they are
//! framework-internal.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Well-known header names.
pub mod headers {
    /// Prefix for all framework-internal headers.
    pub const PREFIX: &str = "testbus_";

    /// Logical, transport-neutral key carrying the SOAP action of a message.
    pub const SOAP_ACTION: &str = "testbus_soap_action";

    /// Variable name the receive action stores the last payload under.
    pub const RECEIVED_PAYLOAD: &str = "testbus_received_payload";

    /// Variable name prefix for received headers.
    pub const RECEIVED_HEADER_PREFIX: &str = "testbus_received_header:";
}

/// Message payload, either text or raw bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Text(String),
    Binary(Vec<u8>),
}

impl Payload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(s) => Some(s),
            Payload::Binary(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Payload::Text(s) => s.len(),
            Payload::Binary(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Logical message exchanged with endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub payload: Payload,
    #[serde(default)]
    pub headers: IndexMap<String, String>,
}

impl Message {
    pub fn text(payload: impl Into<String>) -> Self {
        Self { payload: Payload::Text(payload.into()), headers: IndexMap::new() }
    }

    pub fn binary(payload: Vec<u8>) -> Self {
        Self { payload: Payload::Binary(payload), headers: IndexMap::new() }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Remove a header, returning its previous value.
    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        self.headers.shift_remove(name)
    }

    /// Payload as text, if it is text.
    pub fn payload_text(&self) -> Option<&str> {
        self.payload.as_text()
    }
}

/// Raw wire-side message as handed to or received from a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportMessage {
    pub body: Vec<u8>,
    pub headers: IndexMap<String, String>,
}

impl TransportMessage {
    pub fn new(body: Vec<u8>) -> Self {
        Self { body, headers: IndexMap::new() }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_roundtrip() {
        let mut message = Message::text("<ping/>").with_header("one", "1");
        message.set_header("two", "2");
        assert_eq!(message.header("one"), Some("1"));
        assert_eq!(message.remove_header("one"), Some("1".to_string()));
        assert_eq!(message.header("one"), None);
        assert_eq!(message.header("two"), Some("2"));
    }

    #[test]
    fn payload_text_only_for_text() {
        assert_eq!(Message::text("hi").payload_text(), Some("hi"));
        assert_eq!(Message::binary(vec![1, 2]).payload_text(), None);
    }
}
