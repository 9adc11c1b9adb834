//! TestBus CLI main entry point

use clap::Parser;
use testbus_cli::{
    cli::{Cli, Commands},
    error::CliResult,
    utils::{init_tracing, ColoredOutput},
};
use tracing::info;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", ColoredOutput::error("Error:"), e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    init_tracing()?;

    if cli.no_color {
        colored::control::set_override(false);
    }

    info!("TestBus CLI v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Run { file, policy, timeout_ms } => {
            testbus_cli::commands::run::execute(&file, policy.map(Into::into), timeout_ms).await
        }
        Commands::Validate { file } => testbus_cli::commands::validate::execute(&file),
        Commands::ListActions => testbus_cli::commands::list_actions::execute(),
    }
}
