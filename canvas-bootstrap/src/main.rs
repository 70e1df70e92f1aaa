// /////////////////////////////////////////////////////////////////////////////
// Canvas Reactive Pipeline Framework
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

use std::time::Duration;

use canvas_bootstrap::cli::{self, ValidatedCommand};
use canvas_bootstrap::{exit_code, logger, shutdown};
use canvas_domain::diagnostics::CollectingReporter;
use canvas_compiler::{CompilerOptions, NamedOptions};

#[tokio::main]
async fn main() {
    let validated = match cli::parse_and_validate() {
        Ok(validated) => validated,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(exit_code::EXIT_CLI_PARSE_ERROR);
        }
    };

    if let Err(err) = logger::init_tracing(validated.verbose) {
        eprintln!("warning: failed to initialize tracing: {err}");
    }

    let code = match validated.command {
        ValidatedCommand::Compile { module_dir, output_dir, module_name, descriptor_file, descriptor_dir, required_service } => {
            run_compile(module_dir, output_dir, module_name, descriptor_file, descriptor_dir, required_service)
        }
        ValidatedCommand::Run { module_dir } => run_runtime_shell(module_dir).await,
    };

    std::process::exit(code);
}

fn run_compile(
    module_dir: std::path::PathBuf,
    output_dir: std::path::PathBuf,
    module_name: Option<String>,
    descriptor_file: Option<std::path::PathBuf>,
    descriptor_dir: Option<std::path::PathBuf>,
    required_services: Vec<String>,
) -> i32 {
    let named = NamedOptions::load(&module_dir).unwrap_or_default();
    let module_name = module_name.or(named.module.name);
    let module_name = match module_name {
        Some(name) => name,
        None => {
            tracing::error!("module name not given on the command line and no module.name found in canvas.toml/CANVAS_MODULE__NAME");
            return exit_code::EXIT_INVALID_CONFIGURATION;
        }
    };
    let descriptor_file = descriptor_file.or(named.descriptor.file);
    let descriptor_dir = descriptor_dir.or(named.descriptor.path);
    let options = CompilerOptions { descriptor_file, descriptor_dir, module_name, module_dir, output_dir, required_services };
    let mut reporter = CollectingReporter::new();
    match canvas_compiler::compile(&options, &mut reporter) {
        Ok(ctx) => {
            for diagnostic in reporter.diagnostics() {
                tracing::debug!(?diagnostic, "compile diagnostic");
            }
            tracing::info!(steps = ctx.effective_order.len(), artifacts = ctx.artifacts.len(), "compiled module");
            exit_code::EXIT_SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "compile failed");
            exit_code::exit_code_for(&err)
        }
    }
}

async fn run_runtime_shell(module_dir: std::path::PathBuf) -> i32 {
    let order_path = module_dir.join("order.json");
    let step_count = match std::fs::read_to_string(&order_path) {
        Ok(text) => match serde_json::from_str::<Vec<serde_json::Value>>(&text) {
            Ok(entries) => entries.len(),
            Err(err) => {
                tracing::error!(error = %err, path = %order_path.display(), "failed to parse order.json");
                return exit_code::EXIT_INVALID_CONFIGURATION;
            }
        },
        Err(err) => {
            tracing::error!(error = %err, path = %order_path.display(), "failed to read order.json; run `compile` first");
            return exit_code::EXIT_INVALID_CONFIGURATION;
        }
    };

    tracing::info!(steps = step_count, module_dir = %module_dir.display(), "runtime shell ready; waiting for shutdown signal");

    let coordinator = shutdown::ShutdownCoordinator::new(Duration::from_secs(shutdown::DEFAULT_GRACE_PERIOD_SECS));
    shutdown::wait_for_signal(&coordinator).await;

    tracing::info!("shutdown signal received; stopping");
    exit_code::EXIT_SUCCESS
}
