//! Command-line interface for the reasoning pipeline.

pub mod commands;
pub mod display;
pub mod types;

pub use types::{Cli, Commands};

/// Print a top-level error and exit with a non-zero status.
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    if json {
        eprintln!(
            "{}",
            serde_json::json!({ "error": format!("{err:#}") })
        );
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
