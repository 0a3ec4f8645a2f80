//! ahuctl - AHU alarm doctor
//!
//! Paste a BAS alarm message, get likely causes and corrective actions.

use ahuctl::cli::Cli;
use ahuctl::{commands, errors, logging};
use clap::Parser;
use tracing::info;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    info!("ahuctl v{} starting", env!("AHUCTL_VERSION"));

    let code = match commands::run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            errors::exit_code_for(&err)
        }
    };

    std::process::exit(code);
}
