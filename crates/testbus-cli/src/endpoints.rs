//! Instantiate concrete endpoints from declarative endpoint specs.

use std::sync::Arc;

use serde::Deserialize;
use testbus_config::EndpointSpec;
use testbus_core::mock::{MockQueueEndpoint, MockServerEndpoint};
use testbus_core::{Endpoint, EndpointRegistry};
use testbus_soap::{SoapConverterConfig, SoapEnvelopeConverter, SoapQueueEndpoint};

use crate::error::{CliError, CliResult};

#[derive(Debug, Default, Deserialize)]
struct MockServerConfig {
    #[serde(default)]
    fail_on_stop: bool,
}

#[derive(Debug, Default, Deserialize)]
struct SoapQueueConfig {
    #[serde(default)]
    text_encoding: Option<String>,
    #[serde(default)]
    transport_action_header: Option<String>,
}

fn parse_endpoint_config<T: serde::de::DeserializeOwned + Default>(
    spec: &EndpointSpec,
) -> CliResult<T> {
    if spec.config.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(spec.config.clone())?)
}

/// Build the endpoint registry for a test run from its binding specs.
pub fn build_endpoint_registry(specs: &[EndpointSpec]) -> CliResult<EndpointRegistry> {
    let mut builder = EndpointRegistry::builder();
    for spec in specs {
        let endpoint: Arc<dyn Endpoint> = match spec.kind.as_str() {
            "mock-queue" => Arc::new(MockQueueEndpoint::new(spec.name.clone())),
            "mock-server" => {
                let config: MockServerConfig = parse_endpoint_config(spec)?;
                let mut server = MockServerEndpoint::new(spec.name.clone());
                if config.fail_on_stop {
                    server = server.failing_on_stop();
                }
                Arc::new(server)
            }
            "soap-queue" => {
                let config: SoapQueueConfig = parse_endpoint_config(spec)?;
                let mut converter_config = match &config.text_encoding {
                    Some(label) => SoapConverterConfig::with_encoding_label(label)?,
                    None => SoapConverterConfig::default(),
                };
                if let Some(header) = config.transport_action_header {
                    converter_config = converter_config.transport_action_header(header);
                }
                Arc::new(SoapQueueEndpoint::new(
                    spec.name.clone(),
                    SoapEnvelopeConverter::new(converter_config),
                ))
            }
            other => {
                return Err(CliError::UnknownEndpointKind {
                    name: spec.name.to_string(),
                    kind: other.to_string(),
                })
            }
        };
        builder = builder.bind(endpoint);
    }
    Ok(builder.build())
}
