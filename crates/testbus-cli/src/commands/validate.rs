//! Validate a test definition file without executing it.

use crate::error::CliResult;
use crate::utils::ColoredOutput;

pub fn execute(file: &str) -> CliResult<()> {
    let manifest = testbus_config::load_from_file(file)?;
    let (definition, endpoints) = testbus_config::manifest_to_definition(&manifest)?;

    println!(
        "{} {} is valid: {} action(s), {} endpoint binding(s)",
        ColoredOutput::success("OK"),
        file,
        definition.actions.len(),
        endpoints.len()
    );
    Ok(())
}
