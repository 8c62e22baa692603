//! cellrun CLI Application
//!
//! Command-line interface for running declarative matrix pipelines: load a
//! workflow file, resolve the trigger context, expand the matrix into cells,
//! and execute the step sequence in every cell.

// CLI binary needs to output to stdout/stderr - this is intentional
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;
mod commands;
mod tracing;

use crate::cli::{Commands, parse};
use crate::commands::run::RunArgs;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let exit_code = match run_main().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{error:?}");
            1
        }
    };
    std::process::exit(exit_code);
}

async fn run_main() -> miette::Result<i32> {
    let cli = parse();

    tracing::init_tracing(cli.level.into(), cli.json)?;

    let result = match cli.command {
        Commands::Run {
            file,
            event,
            branch,
            base_branch,
            dry_run,
            fail_fast,
            report_json,
            no_capture,
        } => {
            commands::run::execute(RunArgs {
                file,
                event,
                branch,
                base_branch,
                dry_run,
                fail_fast,
                report_json,
                no_capture,
            })
            .await
        }
        Commands::Cells { file } => commands::cells::execute(&file),
        Commands::Validate { file } => commands::validate::execute(&file),
    };

    result.map_err(|e| miette::miette!("{e}"))
}
