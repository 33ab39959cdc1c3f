//! Public key bytes as carried on the wire.

use ed25519_dalek::{VerifyingKey, PUBLIC_KEY_LENGTH};
use serde::{Deserialize, Serialize};

/// Raw Ed25519 public key bytes.
///
/// Events carry keys undecoded so that verifiers can reject a bad key with a
/// verdict instead of the payload failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKeyBytes(#[serde(with = "granular_canonical::bytes")] Vec<u8>);

impl PublicKeyBytes {
    /// Wraps raw bytes without validating them.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Encodes a verifying key.
    pub fn from_key(key: &VerifyingKey) -> Self {
        Self(key.as_bytes().to_vec())
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Decodes into a usable key. Small-order (weak) keys are refused.
    pub fn to_verifying_key(&self) -> Option<VerifyingKey> {
        let bytes: &[u8; PUBLIC_KEY_LENGTH] = self.0.as_slice().try_into().ok()?;
        let key = VerifyingKey::from_bytes(bytes).ok()?;
        (!key.is_weak()).then_some(key)
    }
}

impl From<&VerifyingKey> for PublicKeyBytes {
    fn from(key: &VerifyingKey) -> Self {
        Self::from_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::SigningKey;
    use rand::rngs::OsRng;

    #[test]
    fn generated_key_decodes() {
        let key = SigningKey::generate(&mut OsRng).verifying_key();
        assert_eq!(PublicKeyBytes::from_key(&key).to_verifying_key(), Some(key));
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert!(PublicKeyBytes::new(vec![1, 2, 3]).to_verifying_key().is_none());
    }

    #[test]
    fn identity_point_is_weak() {
        let mut identity = [0u8; 32];
        identity[0] = 1;
        assert!(PublicKeyBytes::new(identity.to_vec()).to_verifying_key().is_none());
    }
}
