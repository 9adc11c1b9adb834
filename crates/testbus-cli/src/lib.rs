//! TestBus command line runner.

pub mod cli;
pub mod commands;
pub mod endpoints;
pub mod error;
pub mod utils;

pub use error::{CliError, CliResult};
