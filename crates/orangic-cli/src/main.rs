//! Orangic CLI
//!
//! Command-line interface for chatting with Orangic models and inspecting
//! the account behind an API key.

use clap::Parser;

mod cli;
mod commands;
mod output;
mod settings;

use cli::Cli;
use output::{CommandResult, OutputFormat};

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose, cli.json);

    let format = OutputFormat::from_json_flag(cli.json);
    if let Err(e) = cli.execute().await {
        let result: CommandResult<()> = CommandResult::failure(format!("{e:#}"));
        // stdout may already be gone; nothing left to report to
        let _ = result.print(format);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging based on verbosity and format.
///
/// `RUST_LOG` wins over the `-v` count when set.
fn init_tracing(verbose: u8, json: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays clean for replies and JSON
    if json {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(verbose > 1)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
