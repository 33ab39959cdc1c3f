//! Granular CLI - verify, journal and inspect certificate transactions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod commands;
mod network;
mod output;

use commands::{append, inspect, keygen, verify};

#[derive(Parser)]
#[command(name = "granular")]
#[command(about = "Granular certificate transaction verification CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an Ed25519 key pair
    Keygen,
    /// Verify a transaction against the configured journals
    Verify {
        /// Network configuration (YAML)
        #[arg(long)]
        config: PathBuf,
        /// Transaction JSON file
        transaction: PathBuf,
        /// Exit with error code if the transaction is invalid
        #[arg(long)]
        strict: bool,
        /// Deadline for counterpart lookups, in seconds
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,
    },
    /// Verify a transaction and append it to its stream if valid
    Append {
        /// Network configuration (YAML)
        #[arg(long)]
        config: PathBuf,
        /// Transaction JSON file
        transaction: PathBuf,
        /// Deadline for counterpart lookups, in seconds
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,
    },
    /// Show the projected state of a certificate
    Inspect {
        /// Network configuration (YAML)
        #[arg(long)]
        config: PathBuf,
        /// Registry hosting the stream
        #[arg(long)]
        registry: String,
        /// Stream UUID
        #[arg(long)]
        stream: Uuid,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Keygen => keygen::run(),
        Commands::Verify {
            config,
            transaction,
            strict,
            timeout_secs,
        } => verify::run(config, transaction, strict, timeout_secs).await,
        Commands::Append {
            config,
            transaction,
            timeout_secs,
        } => append::run(config, transaction, timeout_secs).await,
        Commands::Inspect {
            config,
            registry,
            stream,
        } => inspect::run(config, registry, stream).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
