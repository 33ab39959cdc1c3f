pub mod append;
pub mod inspect;
pub mod keygen;
pub mod verify;

use std::path::Path;

use granular_core::Transaction;

/// Reads a transaction JSON file.
pub fn read_transaction(path: &Path) -> Result<Transaction, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let transaction = serde_json::from_slice(&bytes)
        .map_err(|e| format!("Invalid transaction {}: {}", path.display(), e))?;
    Ok(transaction)
}
