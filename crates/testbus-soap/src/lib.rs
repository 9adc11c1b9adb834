//! SOAP envelope message conversion for TestBus transports.
//!
//! Incoming transport messages are reduced to the SOAP body as the logical
//! payload; outgoing messages get an envelope wrapped around theirs. The
//! SOAP action travels as a transport header on the wire and under a fixed
//! namespaced key on logical messages.

pub mod config;
pub mod convert;
pub mod endpoint;
pub mod envelope;
pub mod error;

pub use config::{SoapConverterConfig, DEFAULT_TRANSPORT_ACTION_HEADER};
pub use convert::{MessageConverter, PlainTextConverter};
pub use endpoint::SoapQueueEndpoint;
pub use envelope::{SoapEnvelopeConverter, SOAP_ENV_NAMESPACE};
pub use error::{SoapError, SoapResult};
