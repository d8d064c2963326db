//! xbe CLI - command-line client for the XBE platform.

mod cli;
mod commands;

use clap::FromArgMatches;
use cli::Cli;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

/// Log to stderr; stdout carries command output only.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let matches = cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    init_logging(cli.verbose);

    if let Err(e) = commands::run(&matches) {
        if let Some(body) = e.response_body() {
            eprintln!("{}", body);
        }
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
