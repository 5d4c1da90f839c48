use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;

use beacon::config::Config;
use beacon::storage::{self, DATA_DIR, Store};
use beacon::sync::{SyncClient, SyncPayload};

#[derive(Parser)]
#[command(name = "beacon")]
#[command(
    about = "Relay page metadata to a local backend, trying each configured endpoint in order",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and a default config
    Init {
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },

    /// Deliver one payload to the first accepting endpoint
    Sync {
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// Page URL to report
        #[arg(long)]
        url: String,

        /// Page title to report
        #[arg(long, default_value = "")]
        title: String,
    },

    /// Show the last recorded sync outcome
    Status {
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path } => {
            storage::init(&path).await?;
            println!("{}", "✓ Beacon data directory initialized".green());
            println!(
                "  Config: {}",
                path.join(DATA_DIR).join("config.json").display()
            );
        }

        Commands::Sync { path, url, title } => {
            let data_dir = path.join(DATA_DIR);
            let config = Config::load_or_default(&data_dir)?;

            let store = Arc::new(Store::new(&data_dir)?);
            store.initialize()?;

            let client = SyncClient::new(config.endpoints.clone(), store)?;
            let payload = SyncPayload::now(url, title);

            match client.sync(&payload).await {
                Ok(data) => {
                    println!("{} {}", "✓".green(), "Sync delivered".bold());
                    println!("{}", serde_json::to_string_pretty(&data)?);
                }
                Err(err) => {
                    eprintln!("{} {}", "✗".red(), err);
                    std::process::exit(1);
                }
            }
        }

        Commands::Status { path } => {
            let data_dir = path.join(DATA_DIR);
            let store = Store::new(&data_dir)?;
            store.initialize()?;

            match (store.last_sync()?, store.sync_data()?) {
                (Some(last_sync), Some(sync_data)) => {
                    println!("{} {}", "Last sync:".cyan().bold(), last_sync);
                    println!("{}", serde_json::to_string_pretty(&sync_data)?);
                }
                _ => {
                    println!("{}", "No successful sync recorded yet".yellow());
                }
            }
        }
    }

    Ok(())
}
