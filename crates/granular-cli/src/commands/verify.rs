//! Verify command implementation.

use std::path::PathBuf;
use std::time::Duration;

use crate::commands::read_transaction;
use crate::network::Network;
use crate::output::{format_json, verdict_json};

pub async fn run(
    config: PathBuf,
    transaction: PathBuf,
    strict: bool,
    timeout_secs: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let network = Network::load(&config)?;
    let transaction = read_transaction(&transaction)?;

    let verdict = network
        .dispatcher(Duration::from_secs(timeout_secs))
        .verify(&transaction)
        .await?;
    println!("{}", format_json(&verdict_json(&verdict)));

    if strict && !verdict.is_valid() {
        std::process::exit(1);
    }
    Ok(())
}
