//! Signed transactions carrying one certificate event.
//!
//! The header binds the target stream, payload type and a SHA-512 of the
//! payload. The signature covers a domain separator followed by the
//! canonical JSON of the header, so the payload is signed transitively.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use granular_canonical::{canonical_bytes, CanonicalizationError, FederatedStreamId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use uuid::Uuid;

use crate::errors::{CoreError, PayloadError};
use crate::events::CertificateEvent;

const TRANSACTION_DOMAIN_SEPARATOR: &[u8] = b"granular:transaction:v1\0";

/// Signed part of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHeader {
    /// Stream the event is appended to.
    pub federated_stream_id: FederatedStreamId,
    /// Payload type name, e.g. `granular.v1.IssuedEvent`.
    pub payload_type: String,
    /// SHA-512 of the payload bytes.
    #[serde(with = "granular_canonical::bytes")]
    pub payload_sha512: Vec<u8>,
    /// Client nonce making otherwise identical transactions distinct.
    pub nonce: String,
}

impl TransactionHeader {
    /// Bytes covered by the header signature.
    pub fn signing_bytes(&self) -> Result<Vec<u8>, CanonicalizationError> {
        let canonical = canonical_bytes(self)?;
        let mut bytes = Vec::with_capacity(TRANSACTION_DOMAIN_SEPARATOR.len() + canonical.len());
        bytes.extend_from_slice(TRANSACTION_DOMAIN_SEPARATOR);
        bytes.extend_from_slice(&canonical);
        Ok(bytes)
    }
}

/// A header, its Ed25519 signature and the event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Signed header.
    pub header: TransactionHeader,
    /// Signature over [`TransactionHeader::signing_bytes`].
    #[serde(with = "granular_canonical::bytes")]
    pub header_signature: Vec<u8>,
    /// Canonical JSON of the event.
    #[serde(with = "granular_canonical::bytes")]
    pub payload: Vec<u8>,
}

impl Transaction {
    /// Builds and signs a transaction appending `event` to `stream`.
    pub fn sign(
        stream: FederatedStreamId,
        event: &CertificateEvent,
        key: &SigningKey,
    ) -> Result<Self, CoreError> {
        let payload = event.payload_bytes()?;
        let header = TransactionHeader {
            federated_stream_id: stream,
            payload_type: event.kind().payload_type().to_string(),
            payload_sha512: Sha512::digest(&payload).to_vec(),
            nonce: Uuid::new_v4().to_string(),
        };
        let signature = key.sign(&header.signing_bytes()?);
        Ok(Self {
            header,
            header_signature: signature.to_bytes().to_vec(),
            payload,
        })
    }

    /// Whether the header signature verifies under `key`.
    pub fn is_signature_valid(&self, key: &VerifyingKey) -> bool {
        let Ok(signature) = Signature::from_slice(&self.header_signature) else {
            return false;
        };
        match self.header.signing_bytes() {
            Ok(message) => key.verify_strict(&message, &signature).is_ok(),
            Err(_) => false,
        }
    }

    /// Whether the header's payload hash matches the payload.
    pub fn payload_hash_matches(&self) -> bool {
        Sha512::digest(&self.payload).as_slice() == self.header.payload_sha512.as_slice()
    }

    /// Decodes the payload according to the header's payload type.
    pub fn decode_event(&self) -> Result<CertificateEvent, PayloadError> {
        CertificateEvent::decode(&self.header.payload_type, &self.payload)
    }

    /// Content-derived id: base64url SHA-256 of the canonical transaction.
    pub fn transaction_id(&self) -> Result<String, CanonicalizationError> {
        let bytes = canonical_bytes(self)?;
        Ok(URL_SAFE_NO_PAD.encode(Sha256::digest(&bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ClaimedEvent;
    use rand::rngs::OsRng;

    fn claimed(stream: &FederatedStreamId) -> CertificateEvent {
        CertificateEvent::Claimed(ClaimedEvent {
            certificate_id: stream.clone(),
            allocation_id: Uuid::new_v4(),
        })
    }

    #[test]
    fn signed_transaction_verifies() {
        let key = SigningKey::generate(&mut OsRng);
        let stream = FederatedStreamId::random("registry-a");
        let tx = Transaction::sign(stream.clone(), &claimed(&stream), &key).unwrap();

        assert!(tx.is_signature_valid(&key.verifying_key()));
        assert!(tx.payload_hash_matches());
        assert_eq!(tx.decode_event().unwrap(), claimed_from(&tx));
    }

    fn claimed_from(tx: &Transaction) -> CertificateEvent {
        CertificateEvent::Claimed(serde_json::from_slice(&tx.payload).unwrap())
    }

    #[test]
    fn other_key_does_not_verify() {
        let key = SigningKey::generate(&mut OsRng);
        let other = SigningKey::generate(&mut OsRng);
        let stream = FederatedStreamId::random("registry-a");
        let tx = Transaction::sign(stream.clone(), &claimed(&stream), &key).unwrap();

        assert!(!tx.is_signature_valid(&other.verifying_key()));
    }

    #[test]
    fn tampered_header_breaks_signature() {
        let key = SigningKey::generate(&mut OsRng);
        let stream = FederatedStreamId::random("registry-a");
        let mut tx = Transaction::sign(stream.clone(), &claimed(&stream), &key).unwrap();
        tx.header.nonce = "replayed".into();

        assert!(!tx.is_signature_valid(&key.verifying_key()));
    }

    #[test]
    fn tampered_payload_breaks_hash() {
        let key = SigningKey::generate(&mut OsRng);
        let stream = FederatedStreamId::random("registry-a");
        let mut tx = Transaction::sign(stream.clone(), &claimed(&stream), &key).unwrap();
        tx.payload.push(b' ');

        assert!(!tx.payload_hash_matches());
    }

    #[test]
    fn transaction_id_is_stable() {
        let key = SigningKey::generate(&mut OsRng);
        let stream = FederatedStreamId::random("registry-a");
        let tx = Transaction::sign(stream.clone(), &claimed(&stream), &key).unwrap();
        let id = tx.transaction_id().unwrap();

        assert_eq!(id.len(), 43);
        assert_eq!(tx.clone().transaction_id().unwrap(), id);
    }
}
