//! SOAP envelope wrapping and unwrapping.
//!
//! Decorates a base converter: outbound messages get their payload wrapped
//! in a SOAP 1.1 envelope before hitting the wire, inbound messages are
//! reduced to the envelope's body content. The SOAP action header is
//! translated between its transport-specific name and the fixed logical key.

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use testbus_core::{Message, TransportMessage};

use crate::config::SoapConverterConfig;
use crate::convert::{MessageConverter, PlainTextConverter};
use crate::error::{SoapError, SoapResult};

/// SOAP 1.1 envelope namespace.
pub const SOAP_ENV_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

const ENVELOPE_TAG: &str = "soapenv:Envelope";
const HEADER_TAG: &str = "soapenv:Header";
const BODY_TAG: &str = "soapenv:Body";

/// Envelope-aware converter layered over a base transport converter.
pub struct SoapEnvelopeConverter {
    inner: Box<dyn MessageConverter>,
    config: SoapConverterConfig,
}

impl SoapEnvelopeConverter {
    /// Converter over the default text base converter using the
    /// configuration's charset.
    pub fn new(config: SoapConverterConfig) -> Self {
        let inner = Box::new(PlainTextConverter::new(config.text_encoding));
        Self { inner, config }
    }

    /// Converter decorating a caller-supplied base converter.
    pub fn with_inner(inner: Box<dyn MessageConverter>, config: SoapConverterConfig) -> Self {
        Self { inner, config }
    }

    pub fn config(&self) -> &SoapConverterConfig {
        &self.config
    }
}

impl Default for SoapEnvelopeConverter {
    fn default() -> Self {
        Self::new(SoapConverterConfig::default())
    }
}

impl MessageConverter for SoapEnvelopeConverter {
    fn to_transport(&self, message: &Message) -> SoapResult<TransportMessage> {
        let payload = message.payload.as_text().ok_or_else(|| {
            SoapError::envelope_serialize("logical payload is binary, expected XML text")
        })?;

        tracing::debug!(payload_len = payload.len(), "wrapping payload in SOAP envelope");
        let mut enveloped = message.clone();
        enveloped.payload = testbus_core::Payload::Text(wrap_in_envelope(payload)?);

        // Translate the SOAP action header to its transport name.
        if let Some(action) = enveloped.remove_header(&self.config.logical_action_header) {
            enveloped.set_header(self.config.transport_action_header.clone(), action);
        }

        self.inner.to_transport(&enveloped)
    }

    fn from_transport(&self, transport: &TransportMessage) -> SoapResult<Message> {
        let mut message = self.inner.from_transport(transport)?;

        let text = match message.payload.as_text() {
            Some(text) => text,
            // The base converter always produces text; guard anyway.
            None => return Err(SoapError::envelope_parse("transport payload is not text")),
        };
        let body = extract_body_content(text)?;
        message.payload = testbus_core::Payload::Text(body);

        // Translate the SOAP action header to its logical key.
        if let Some(action) = message.remove_header(&self.config.transport_action_header) {
            message.set_header(self.config.logical_action_header.clone(), action);
        }

        Ok(message)
    }
}

/// Wrap an XML payload into `<Envelope><Header/><Body>payload</Body></Envelope>`.
///
/// The payload is streamed through an XML reader, which both validates it
/// and re-emits it untouched inside the body element. A leading XML
/// declaration is dropped.
fn wrap_in_envelope(payload: &str) -> SoapResult<String> {
    let mut writer = Writer::new(Vec::new());

    let mut envelope = BytesStart::new(ENVELOPE_TAG);
    envelope.push_attribute(("xmlns:soapenv", SOAP_ENV_NAMESPACE));
    write_event(&mut writer, Event::Start(envelope))?;
    write_event(&mut writer, Event::Empty(BytesStart::new(HEADER_TAG)))?;
    write_event(&mut writer, Event::Start(BytesStart::new(BODY_TAG)))?;

    let mut reader = Reader::from_str(payload);
    let mut depth: usize = 0;
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(Event::Decl(_)) => continue,
            Ok(event) => {
                match &event {
                    Event::Start(_) => depth += 1,
                    Event::End(_) => {
                        depth = depth.checked_sub(1).ok_or_else(|| {
                            SoapError::envelope_serialize("payload has an unmatched end tag")
                        })?;
                    }
                    _ => {}
                }
                write_event(&mut writer, event)?;
            }
            Err(e) => return Err(SoapError::envelope_serialize(e.to_string())),
        }
    }
    if depth != 0 {
        return Err(SoapError::envelope_serialize("payload has an unclosed element"));
    }

    write_event(&mut writer, Event::End(BytesEnd::new(BODY_TAG)))?;
    write_event(&mut writer, Event::End(BytesEnd::new(ENVELOPE_TAG)))?;

    String::from_utf8(writer.into_inner())
        .map_err(|e| SoapError::envelope_serialize(e.to_string()))
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> SoapResult<()> {
    writer.write_event(event).map_err(|e| SoapError::envelope_serialize(e.to_string()))
}

enum ExtractState {
    Prolog,
    InEnvelope,
    /// Skipping a non-body child of the envelope, e.g. the header.
    Skipping(usize),
    /// Inside the body, tracking element nesting of the payload.
    InBody(usize),
    Done,
}

/// Extract the content of the SOAP body from an envelope document.
///
/// Element names are matched by local name, so any envelope prefix is
/// accepted. Nested elements that happen to be named `Body` are handled by
/// depth tracking.
fn extract_body_content(envelope: &str) -> SoapResult<String> {
    let mut reader = Reader::from_str(envelope);
    let mut writer = Writer::new(Vec::new());
    let mut state = ExtractState::Prolog;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => return Err(SoapError::envelope_parse(e.to_string())),
        };
        if matches!(&event, Event::Eof) {
            break;
        }

        state = match state {
            ExtractState::Prolog => match &event {
                Event::Start(e) => {
                    if e.local_name().as_ref() == b"Envelope" {
                        ExtractState::InEnvelope
                    } else {
                        return Err(SoapError::envelope_parse(format!(
                            "root element '{}' is not a SOAP envelope",
                            String::from_utf8_lossy(e.name().as_ref())
                        )));
                    }
                }
                Event::Empty(_) => {
                    return Err(SoapError::envelope_parse(
                        "document root is an empty element, expected a SOAP envelope",
                    ));
                }
                // Declaration, comments and whitespace before the root.
                _ => ExtractState::Prolog,
            },
            ExtractState::InEnvelope => match &event {
                Event::Start(e) => {
                    if e.local_name().as_ref() == b"Body" {
                        ExtractState::InBody(0)
                    } else {
                        ExtractState::Skipping(0)
                    }
                }
                Event::Empty(e) if e.local_name().as_ref() == b"Body" => ExtractState::Done,
                _ => ExtractState::InEnvelope,
            },
            ExtractState::Skipping(depth) => match &event {
                Event::Start(_) => ExtractState::Skipping(depth + 1),
                Event::End(_) => {
                    if depth == 0 {
                        ExtractState::InEnvelope
                    } else {
                        ExtractState::Skipping(depth - 1)
                    }
                }
                _ => ExtractState::Skipping(depth),
            },
            ExtractState::InBody(depth) => match &event {
                Event::Start(_) => {
                    write_body_event(&mut writer, &event)?;
                    ExtractState::InBody(depth + 1)
                }
                Event::End(_) => {
                    if depth == 0 {
                        ExtractState::Done
                    } else {
                        write_body_event(&mut writer, &event)?;
                        ExtractState::InBody(depth - 1)
                    }
                }
                _ => {
                    write_body_event(&mut writer, &event)?;
                    ExtractState::InBody(depth)
                }
            },
            ExtractState::Done => ExtractState::Done,
        };
    }

    if !matches!(state, ExtractState::Done) {
        return Err(SoapError::envelope_parse("document contains no complete SOAP body"));
    }

    String::from_utf8(writer.into_inner()).map_err(|e| SoapError::envelope_parse(e.to_string()))
}

fn write_body_event(writer: &mut Writer<Vec<u8>>, event: &Event<'_>) -> SoapResult<()> {
    writer.write_event(event.clone()).map_err(|e| SoapError::envelope_parse(e.to_string()))
}
