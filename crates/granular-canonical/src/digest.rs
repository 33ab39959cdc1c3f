use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;

use crate::validation::ValidationError;

/// Identifier of a certificate slice: SHA-256 over the compressed commitment.
///
/// Encoded as base64url without padding (43 characters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SliceId([u8; 32]);

impl SliceId {
    /// Hashes commitment bytes into a slice id.
    pub fn from_commitment_bytes(commitment: &[u8]) -> Self {
        let hash = Sha256::digest(commitment);
        Self(hash.into())
    }

    /// Wraps raw digest bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parses a base64url (no padding) slice id.
    pub fn parse(b64: &str) -> Result<Self, ValidationError> {
        let re = Regex::new(r"^[A-Za-z0-9_-]{43}$").expect("invalid regex");
        if !re.is_match(b64) {
            return Err(ValidationError::PatternMismatch {
                field: "slice_id",
                value: b64.to_string(),
            });
        }
        let bytes = URL_SAFE_NO_PAD
            .decode(b64)
            .map_err(|_| ValidationError::PatternMismatch {
                field: "slice_id",
                value: b64.to_string(),
            })?;
        let actual = bytes.len();
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| ValidationError::InvalidLength {
            field: "slice_id",
            expected: 32,
            actual,
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for SliceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&URL_SAFE_NO_PAD.encode(self.0))
    }
}

impl Serialize for SliceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SliceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        SliceId::parse(&s).map_err(serde::de::Error::custom)
    }
}
