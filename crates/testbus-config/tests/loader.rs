use std::io::Write;

use testbus_config::{
    load_from_file, manifest_to_definition, parse_content, ConfigError, FileFormat,
};
use testbus_core::{EndpointName, FailurePolicy};

const YAML: &str = r#"
name: order-flow
description: exercise the order queue
failure_policy: collect-all
endpoints:
  orders:
    kind: mock-queue
  app:
    kind: mock-server
    fail_on_stop: false
actions:
  - action: send
    endpoint: orders
    payload: "<order id=\"1\"/>"
  - action: receive
    endpoint: orders
    timeout_ms: 500
  - action: stop-server
    name: shutdown
    server: app
"#;

#[test]
fn yaml_manifest_parses_into_definition_and_specs() {
    let manifest = parse_content(YAML, FileFormat::Yaml).unwrap();
    let (definition, endpoints) = manifest_to_definition(&manifest).unwrap();

    assert_eq!(definition.name, "order-flow");
    assert_eq!(definition.failure_policy, FailurePolicy::CollectAll);
    assert_eq!(definition.actions.len(), 3);
    assert_eq!(definition.actions[0].kind.as_str(), "send");
    assert_eq!(definition.actions[0].config["endpoint"], "orders");
    assert_eq!(definition.actions[2].display_name(), "shutdown");

    assert_eq!(endpoints.len(), 2);
    assert_eq!(endpoints[0].name, EndpointName::new("orders"));
    assert_eq!(endpoints[0].kind, "mock-queue");
    assert_eq!(endpoints[1].config["fail_on_stop"], false);
}

#[test]
fn json_manifest_parses() {
    let json = r#"{
        "name": "smoke",
        "actions": [ { "action": "echo", "message": "hi" } ]
    }"#;
    let manifest = parse_content(json, FileFormat::Json).unwrap();
    assert_eq!(manifest.version, "v1");
    assert_eq!(manifest.failure_policy, FailurePolicy::AbortOnFirstFailure);
    assert_eq!(manifest.actions[0].config["message"], "hi");
}

#[test]
fn file_format_is_detected_by_extension() {
    assert_eq!(FileFormat::from_path("t.yaml").unwrap(), FileFormat::Yaml);
    assert_eq!(FileFormat::from_path("t.yml").unwrap(), FileFormat::Yaml);
    assert_eq!(FileFormat::from_path("t.json").unwrap(), FileFormat::Json);
    assert!(matches!(
        FileFormat::from_path("t.xml"),
        Err(ConfigError::UnsupportedFormat(ext)) if ext == "xml"
    ));
    assert!(matches!(
        FileFormat::from_path("noext"),
        Err(ConfigError::UnsupportedFormat(_))
    ));
}

#[test]
fn empty_action_list_is_rejected() {
    let err = parse_content("name: empty\nactions: []\n", FileFormat::Yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(msg) if msg.contains("no actions")));
}

#[test]
fn empty_action_kind_is_rejected() {
    let yaml = "name: bad\nactions:\n  - action: \"\"\n";
    let err = parse_content(yaml, FileFormat::Yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn loads_from_a_real_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(YAML.as_bytes()).unwrap();

    let manifest = load_from_file(file.path()).unwrap();
    assert_eq!(manifest.name, "order-flow");
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_from_file("does/not/exist.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
