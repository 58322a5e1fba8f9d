//! cfnkit CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Validation failure
//! - 4: Parse or import failure

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;

use commands::{Cli, Commands, Session};
use error::{categorize_error, ExitCodes};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "cfnkit=debug"
    } else if cli.quiet {
        "cfnkit=error"
    } else {
        "cfnkit=info"
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(level.parse().unwrap())
        .add_directive("warn".parse().unwrap());

    // Logs go to stderr so rendered documents on stdout stay parseable.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let result = Session::open(&cli).and_then(|session| match cli.command {
        Commands::Validate(args) => commands::validate::execute(args, &session),
        Commands::Render(args) => commands::render::execute(args, &session),
        Commands::Import(args) => commands::import::execute(args, &session),
        Commands::Synth(args) => commands::synth::execute(args, &session),
        Commands::Schemas(args) => commands::schemas::execute(args, &session),
    });

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}
