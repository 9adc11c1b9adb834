//! Test definition file loading and validation.

use std::fs;
use std::path::Path;

use testbus_core::{ActionDescriptor, ActionKind, EndpointName, TestDefinition};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{EndpointSpec, TestManifest};

/// Supported file formats for test definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    /// Detect file format from extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Ok(FileFormat::Yaml),
            Some("json") => Ok(FileFormat::Json),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }
}

/// Load and validate a test manifest from a file.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<TestManifest> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)?;
    let content = fs::read_to_string(path)?;
    parse_content(&content, format)
}

/// Parse and validate manifest content directly.
pub fn parse_content(content: &str, format: FileFormat) -> ConfigResult<TestManifest> {
    let manifest: TestManifest = match format {
        FileFormat::Yaml => serde_yaml::from_str(content)?,
        FileFormat::Json => serde_json::from_str(content)?,
    };
    validate_manifest(&manifest)?;
    Ok(manifest)
}

/// Structural validation beyond what serde enforces.
pub fn validate_manifest(manifest: &TestManifest) -> ConfigResult<()> {
    if manifest.name.trim().is_empty() {
        return Err(ConfigError::validation("test name must not be empty"));
    }
    if manifest.actions.is_empty() {
        return Err(ConfigError::validation(format!(
            "test '{}' defines no actions",
            manifest.name
        )));
    }
    for (index, entry) in manifest.actions.iter().enumerate() {
        if entry.action.trim().is_empty() {
            return Err(ConfigError::validation(format!(
                "action #{index} of test '{}' has an empty kind",
                manifest.name
            )));
        }
    }
    for (name, endpoint) in &manifest.endpoints {
        if endpoint.kind.trim().is_empty() {
            return Err(ConfigError::validation(format!(
                "endpoint '{name}' has an empty kind"
            )));
        }
    }
    Ok(())
}

/// Convert a manifest into the executable definition plus the endpoint
/// binding instructions, preserving declaration order for both.
pub fn manifest_to_definition(
    manifest: &TestManifest,
) -> ConfigResult<(TestDefinition, Vec<EndpointSpec>)> {
    validate_manifest(manifest)?;

    let actions = manifest
        .actions
        .iter()
        .map(|entry| ActionDescriptor {
            kind: ActionKind::new(entry.action.clone()),
            name: entry.name.clone(),
            config: entry.config.clone(),
        })
        .collect();

    let definition = TestDefinition {
        name: manifest.name.clone(),
        description: manifest.description.clone(),
        failure_policy: manifest.failure_policy,
        actions,
    };

    let endpoints = manifest
        .endpoints
        .iter()
        .map(|(name, endpoint)| EndpointSpec {
            name: EndpointName::new(name.clone()),
            kind: endpoint.kind.clone(),
            config: endpoint.config.clone(),
        })
        .collect();

    Ok((definition, endpoints))
}
