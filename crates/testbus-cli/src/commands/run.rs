//! Execute a test definition file.

use std::sync::Arc;
use std::time::Duration;

use testbus_core::{FailurePolicy, TestContext};
use testbus_runtime::{builtin_registry, ActionExecutor, ExecutionOptions, TestReport};

use crate::endpoints::build_endpoint_registry;
use crate::error::{CliError, CliResult};
use crate::utils::{format_duration_ms, ColoredOutput};

pub async fn execute(
    file: &str,
    policy: Option<FailurePolicy>,
    timeout_ms: Option<u64>,
) -> CliResult<()> {
    let manifest = testbus_config::load_from_file(file)?;
    let (definition, specs) = testbus_config::manifest_to_definition(&manifest)?;
    let endpoints = build_endpoint_registry(&specs)?;

    let executor = ActionExecutor::new(Arc::new(builtin_registry()));
    let mut context = TestContext::new(definition.name.clone(), endpoints);
    let options =
        ExecutionOptions { policy, action_timeout: timeout_ms.map(Duration::from_millis) };

    let report = executor.execute(&definition, &mut context, &options).await;
    print_report(&report, definition.actions.len());

    if report.passed() {
        Ok(())
    } else {
        Err(CliError::TestFailed(report.test_name.clone()))
    }
}

fn print_report(report: &TestReport, total_actions: usize) {
    println!();
    println!(
        "{} {} ({})",
        ColoredOutput::highlight("Test:"),
        report.test_name,
        ColoredOutput::dim(&report.execution_id)
    );

    for action in &report.actions {
        let (badge, detail) = match &action.failure {
            None => (ColoredOutput::success("PASS"), String::new()),
            Some(failure) => (
                ColoredOutput::error("FAIL"),
                format!(" [{}] {}", failure.kind, failure.message),
            ),
        };
        println!(
            "  {} {:2}. {} ({}){}",
            badge,
            action.index + 1,
            action.name,
            format_duration_ms(action.duration_ms),
            detail
        );
        for target in &action.targets {
            match &target.error {
                None => println!(
                    "        {} {}",
                    ColoredOutput::dim("stopped"),
                    target.endpoint
                ),
                Some(error) => println!(
                    "        {} {}: {}",
                    ColoredOutput::warning("failed"),
                    target.endpoint,
                    error
                ),
            }
        }
    }

    let skipped = total_actions - report.actions.len();
    if skipped > 0 {
        println!("  {}", ColoredOutput::dim(&format!("{skipped} action(s) not attempted")));
    }

    let verdict = if report.passed() {
        ColoredOutput::success("PASSED")
    } else {
        ColoredOutput::error("FAILED")
    };
    println!(
        "{} {} in {}",
        ColoredOutput::highlight("Verdict:"),
        verdict,
        format_duration_ms(report.duration_ms)
    );
}
