//! List the registered built-in action kinds.

use testbus_runtime::builtin_registry;

use crate::error::CliResult;
use crate::utils::ColoredOutput;

pub fn execute() -> CliResult<()> {
    let registry = builtin_registry();
    for meta in registry.metadata() {
        println!(
            "  {:18} {}",
            ColoredOutput::highlight(meta.kind.as_str()),
            ColoredOutput::dim(&meta.description)
        );
    }
    Ok(())
}
