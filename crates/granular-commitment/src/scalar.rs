//! Serde adapter encoding a [`Scalar`] as base64 of its canonical 32 bytes.
//!
//! Use with `#[serde(with = "granular_commitment::scalar")]`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use curve25519_dalek::scalar::Scalar;
use serde::{Deserialize, Deserializer, Serializer};

use crate::errors::CommitmentError;

/// Parses a canonically encoded scalar.
pub fn from_bytes(bytes: &[u8]) -> Result<Scalar, CommitmentError> {
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|_| CommitmentError::NonCanonicalScalar)?;
    Option::<Scalar>::from(Scalar::from_canonical_bytes(bytes)).ok_or(CommitmentError::NonCanonicalScalar)
}

/// Serializes a scalar as base64.
pub fn serialize<S: Serializer>(scalar: &Scalar, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(scalar.as_bytes()))
}

/// Deserializes a scalar from base64, rejecting non-canonical encodings.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Scalar, D::Error> {
    let s = String::deserialize(deserializer)?;
    let bytes = STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom)?;
    from_bytes(&bytes).map_err(serde::de::Error::custom)
}
