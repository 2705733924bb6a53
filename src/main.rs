//! Ponder CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ponder::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Query {
            text,
            max_retries,
            threshold,
        } => ponder::cli::commands::query::execute(text, max_retries, threshold, cli.json).await,
        Commands::Classify { text } => ponder::cli::commands::classify::execute(text, cli.json),
        Commands::Patterns => ponder::cli::commands::patterns::execute(cli.json),
        Commands::Demo => ponder::cli::commands::demo::execute(cli.json).await,
    };

    if let Err(err) = result {
        ponder::cli::handle_error(err, cli.json);
    }
}
