//! Keygen command implementation.

use ed25519_dalek::SigningKey;
use granular_canonical::bytes;
use rand::rngs::OsRng;
use serde_json::json;

use crate::output::format_json;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let key = SigningKey::generate(&mut OsRng);
    let output = json!({
        "signing_key": bytes::encode(key.to_bytes()),
        "public_key": bytes::encode(key.verifying_key().as_bytes()),
    });
    println!("{}", format_json(&output));
    Ok(())
}
