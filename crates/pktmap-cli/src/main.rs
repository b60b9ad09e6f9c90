use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod discover;
mod fetch;

#[derive(Debug, Parser)]
#[command(name = "pktmap-cli")]
#[command(about = "Offline snapshot tooling for the packet-radio node map")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scan the map page and its script assets for data endpoints and write a
    /// discovery report
    Discover,
    /// Regenerate the packet node catalog module from the live map data
    Fetch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = pktmap_core::load_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Discover => discover::run(&config).await,
        Commands::Fetch => fetch::run(&config).await,
    }
}
