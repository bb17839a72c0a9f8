mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cu_console::ConsoleConfig;

#[derive(Parser)]
#[command(name = "cu-console")]
#[command(version, about = "Application console navigation states", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "cu-console.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered states with their absolute URLs
    Routes,

    /// Enter the state matching a URL and print the activation as JSON
    Navigate {
        /// URL to navigate to, e.g. /editApplication/acme/overview
        url: String,

        /// Look applications up in the configured `[[applications]]` instead of the API
        #[arg(long)]
        offline: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cu_console=info,cu_router=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ConsoleConfig::load_with_env(&cli.config)?;

    match cli.command {
        Commands::Routes => commands::routes::execute(&config)?,
        Commands::Navigate { url, offline } => {
            commands::navigate::execute(&config, &url, offline).await?
        }
    }

    Ok(())
}
