//! Append command implementation.

use std::path::PathBuf;
use std::time::Duration;

use granular_core::EventStore;
use serde_json::json;
use tracing::info;

use crate::commands::read_transaction;
use crate::network::Network;
use crate::output::{format_json, verdict_json};

pub async fn run(
    config: PathBuf,
    transaction: PathBuf,
    timeout_secs: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let network = Network::load(&config)?;
    let transaction = read_transaction(&transaction)?;
    let stream = transaction.header.federated_stream_id.clone();
    let store = network.store(&stream.registry)?;

    let verdict = network
        .dispatcher(Duration::from_secs(timeout_secs))
        .verify(&transaction)
        .await?;
    if !verdict.is_valid() {
        println!("{}", format_json(&verdict_json(&verdict)));
        std::process::exit(1);
    }

    let transaction_id = transaction.transaction_id()?;
    store.append(transaction).await?;
    info!(%stream, %transaction_id, "transaction appended");

    println!(
        "{}",
        format_json(&json!({
            "appended": true,
            "stream": stream.to_string(),
            "transaction_id": transaction_id,
        }))
    );
    Ok(())
}
