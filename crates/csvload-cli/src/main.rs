//! csvload command-line entry point.

use clap::Parser;
use csvload_cli::logging::init_logging;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command};
use crate::commands::{run_load, run_schema, run_tables};
use crate::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&cli.log_config()) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    // File failures are reported in the summary; only startup errors exit non-zero.
    let result = match &cli.command {
        Command::Run(args) => run_load(args).map(|summary| print_summary(&summary)),
        Command::Schema(args) => run_schema(args),
        Command::Tables(args) => run_tables(args),
    };
    if let Err(error) = result {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}
