mod app_data;
mod carousel;
mod catalog;
mod cli;
mod config;
mod library;
mod model;
mod pagination;
mod rawg;
mod search;
mod state;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging. Logs go to stderr so stdout stays parseable with --json.
    let default_filter = if cli.output.verbose {
        "gamehub=debug,info"
    } else {
        "gamehub=warn,error"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Starting GameHub");

    if let Err(e) = cli::run(cli).await {
        cli::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
