//! store-api CLI entry point
//!
//! This is a minimal entrypoint that:
//! 1. Parses CLI arguments (via cli::run)
//! 2. Dispatches to CLI commands (via cli::run)
//! 3. Logs fatal errors to stderr
//! 4. Exits with non-zero on failure
//!
//! All logic is delegated to the CLI module.

use store_api::cli;
use store_api::observability::{Logger, Severity};

fn main() {
    if let Err(e) = cli::run() {
        Logger::log_stderr(Severity::Error, "startup_failed", &[("error", &e.to_string())]);
        std::process::exit(1);
    }
}
