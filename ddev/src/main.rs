// External crates
use clap::Parser;
use tracing::debug;

// Internal imports
use ddev_core::{ddev_error, ddev_warning};

// Local modules
mod cli;
mod commands;

use cli::Args;
use commands::execute_command;

fn main() {
    let args = Args::parse();

    let default_filter = if args.debug { "debug" } else { "warn" };
    let _log_guard = match ddev_logging::init_with_defaults(default_filter) {
        Ok(guard) => guard,
        Err(e) => {
            ddev_warning!("Failed to initialize logging: {}", e);
            None
        }
    };

    debug!(command = ?args.command, "starting ddev command");

    if let Err(e) = execute_command(args) {
        debug!(error = ?e, "command failed");
        ddev_error!("{:#}", e);
        std::process::exit(1);
    }
}
