//! CLI argument definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use testbus_core::FailurePolicy;

#[derive(Parser)]
#[command(
    name = "testbus",
    about = "TestBus - declarative integration testing for message-based systems",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute a test definition file
    Run {
        /// Test definition file (YAML or JSON)
        #[arg(help = "Test definition file to execute")]
        file: String,

        /// Override the definition's failure policy
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,

        /// Per-action timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Parse and validate a test definition file without executing it
    Validate {
        /// Test definition file (YAML or JSON)
        #[arg(help = "Test definition file to validate")]
        file: String,
    },

    /// List the registered built-in action kinds
    ListActions,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    /// Stop after the first failed action
    Abort,
    /// Run every action and aggregate all failures
    CollectAll,
}

impl From<PolicyArg> for FailurePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Abort => FailurePolicy::AbortOnFirstFailure,
            PolicyArg::CollectAll => FailurePolicy::CollectAll,
        }
    }
}
