//! Serde adapters encoding `Vec<u8>` fields as standard base64 strings.
//!
//! Use with `#[serde(with = "granular_canonical::bytes")]`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serializer};

/// Serializes bytes as a base64 string.
pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}

/// Deserializes bytes from a base64 string.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let s = String::deserialize(deserializer)?;
    STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom)
}

/// Encodes bytes as standard base64.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    STANDARD.encode(bytes)
}

/// Decodes standard base64, returning `None` on malformed input.
pub fn decode(s: &str) -> Option<Vec<u8>> {
    STANDARD.decode(s.trim().as_bytes()).ok()
}
