use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use granular_canonical::SliceId;
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::CommitmentError;
use crate::generators::pedersen_gens;

/// Public Pedersen commitment to a hidden quantity (compressed Ristretto point).
///
/// Any 32 bytes deserialize; bytes that are not a valid point simply never
/// verify against an opening or proof.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Commitment(CompressedRistretto);

impl Commitment {
    /// Parses a 32-byte compressed point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CommitmentError> {
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CommitmentError::InvalidLength(bytes.len()))?;
        Ok(Self(CompressedRistretto(bytes)))
    }

    /// Compresses a group element.
    pub fn from_point(point: &RistrettoPoint) -> Self {
        Self(point.compress())
    }

    /// Compressed bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    /// Decompresses into a group element, `None` if the bytes are not a point.
    pub fn to_point(&self) -> Option<RistrettoPoint> {
        self.0.decompress()
    }

    /// Identifier of a slice carrying this commitment.
    pub fn slice_id(&self) -> SliceId {
        SliceId::from_commitment_bytes(self.as_bytes())
    }

    /// Homomorphic sum of commitments, `None` if any input is not a point.
    pub fn sum<'a>(commitments: impl IntoIterator<Item = &'a Commitment>) -> Option<Commitment> {
        let mut total = RistrettoPoint::default();
        for commitment in commitments {
            total += commitment.to_point()?;
        }
        Some(Self::from_point(&total))
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", STANDARD.encode(self.as_bytes()))
    }
}

impl Serialize for Commitment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(self.as_bytes()))
    }
}

impl<'de> Deserialize<'de> for Commitment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom)?;
        Commitment::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

/// Secret opening `(value, blinding)` of a commitment.
///
/// Held off-ledger by whoever may still spend or prove a slice. Zeroized on
/// drop; `Debug` never shows the contents.
#[derive(Clone, Zeroize, ZeroizeOnDrop, PartialEq, Eq)]
pub struct Opening {
    value: u32,
    blinding: Scalar,
}

impl Opening {
    /// Creates an opening from explicit parts.
    pub fn new(value: u32, blinding: Scalar) -> Self {
        Self { value, blinding }
    }

    /// Creates an opening with a fresh random blinding factor.
    pub fn random(value: u32) -> Self {
        Self::new(value, Scalar::random(&mut OsRng))
    }

    /// Hidden value.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Blinding factor.
    pub fn blinding(&self) -> &Scalar {
        &self.blinding
    }

    /// Computes `value·G + blinding·H`.
    pub fn commit(&self) -> Commitment {
        Commitment::from_point(&self.point())
    }

    pub(crate) fn point(&self) -> RistrettoPoint {
        pedersen_gens().commit(Scalar::from(self.value), self.blinding)
    }
}

impl fmt::Debug for Opening {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Opening(<redacted>)")
    }
}

#[derive(Serialize, Deserialize)]
struct OpeningWire {
    value: u32,
    #[serde(with = "crate::scalar")]
    blinding: Scalar,
}

impl Serialize for Opening {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        OpeningWire {
            value: self.value,
            blinding: self.blinding,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Opening {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut wire = OpeningWire::deserialize(deserializer)?;
        let opening = Opening::new(wire.value, wire.blinding);
        wire.blinding.zeroize();
        Ok(opening)
    }
}

/// Recomputes the commitment from an opening and compares group elements.
pub fn verify_opening(commitment: &Commitment, opening: &Opening) -> bool {
    opening.commit() == *commitment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_verifies_its_own_commitment() {
        let opening = Opening::random(250);
        let commitment = opening.commit();
        assert!(verify_opening(&commitment, &opening));
        assert!(!verify_opening(&commitment, &Opening::new(251, *opening.blinding())));
        assert!(!verify_opening(&commitment, &Opening::random(250)));
    }

    #[test]
    fn debug_hides_secrets() {
        let opening = Opening::new(42, Scalar::from(7u64));
        assert_eq!(format!("{:?}", opening), "Opening(<redacted>)");
    }

    #[test]
    fn commitments_add_homomorphically() {
        let a = Opening::new(100, Scalar::from(3u64));
        let b = Opening::new(150, Scalar::from(4u64));
        let total = Opening::new(250, Scalar::from(7u64));
        assert_eq!(Commitment::sum([&a.commit(), &b.commit()]), Some(total.commit()));
    }

    #[test]
    fn commitment_json_round_trip_and_length_check() {
        let commitment = Opening::random(5).commit();
        let json = serde_json::to_string(&commitment).unwrap();
        let back: Commitment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, commitment);
        assert!(Commitment::from_bytes(&[0u8; 31]).is_err());
    }
}
