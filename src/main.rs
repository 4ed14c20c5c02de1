use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use consultorio::cli::Cli;
use consultorio::config::default_log_filter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    cli.run().await
}
