//! Inspect command implementation.

use std::path::PathBuf;

use granular_canonical::FederatedStreamId;
use granular_core::ModelLoader;
use uuid::Uuid;

use crate::network::Network;
use crate::output::{certificate_json, format_json};

pub async fn run(
    config: PathBuf,
    registry: String,
    stream: Uuid,
) -> Result<(), Box<dyn std::error::Error>> {
    let network = Network::load(&config)?;
    let registry = granular_canonical::RegistryName::parse(registry)
        .map_err(|e| format!("Invalid registry name: {}", e))?;
    let id = FederatedStreamId::new(registry, stream);

    match network.loader.get(&id).await? {
        (Some(certificate), events) => {
            println!("{}", format_json(&certificate_json(&certificate, events)));
            Ok(())
        }
        (None, _) => {
            eprintln!("Certificate not found");
            std::process::exit(1);
        }
    }
}
