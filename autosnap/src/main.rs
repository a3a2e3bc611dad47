// External crates
use clap::Parser;
use tracing::debug;

// Internal imports
use autosnap_core::snap_error_with_details;
use autosnap_logging::{init_subscriber, LogSettings};

// Local modules
mod cli;
mod commands;

use cli::Args;
use commands::execute_command;

fn main() {
    let args = Args::parse();

    let mut settings = LogSettings::from_env();
    if args.debug {
        settings = settings.with_level("debug");
    }
    // Dropping the guard flushes buffered file logs
    let log_guard = init_subscriber(&settings);
    debug!(command = ?args.command, "starting autosnap");

    if let Err(e) = execute_command(args) {
        snap_error_with_details!(e, e.chain().skip(1));
        drop(log_guard);
        std::process::exit(1);
    }
}
