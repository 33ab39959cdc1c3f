//! Schnorr proofs that two commitments hide the same value.
//!
//! For `C₁ = v·G + r₁·H` and `C₂ = v·G + r₂·H` the difference is `(r₁ − r₂)·H`.
//! The prover shows knowledge of that discrete log with respect to `H`, which
//! is only possible when the `G` components cancel. The challenge is derived
//! from a Merlin transcript over the label, both commitments and the nonce
//! point. Wire format: compressed nonce point ‖ response scalar (64 bytes).

use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use merlin::Transcript;
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::commitment::{Commitment, Opening};
use crate::errors::CommitmentError;
use crate::generators::pedersen_gens;

/// Length of a serialized equality proof.
pub const EQUALITY_PROOF_LEN: usize = 64;

const EQUALITY_PROOF_DOMAIN: &[u8] = b"granular-certificate/equality-proof";

fn challenge(label: &[u8], left: &Commitment, right: &Commitment, nonce: &CompressedRistretto) -> Scalar {
    let mut transcript = Transcript::new(EQUALITY_PROOF_DOMAIN);
    transcript.append_message(b"label", label);
    transcript.append_message(b"left", left.as_bytes());
    transcript.append_message(b"right", right.as_bytes());
    transcript.append_message(b"nonce", nonce.as_bytes());
    let mut wide = [0u8; 64];
    transcript.challenge_bytes(b"challenge", &mut wide);
    Scalar::from_bytes_mod_order_wide(&wide)
}

/// Proves that `left` and `right` open to the same value.
pub fn prove_equality(left: &Opening, right: &Opening, label: &[u8]) -> Result<Vec<u8>, CommitmentError> {
    if left.value() != right.value() {
        return Err(CommitmentError::ValueMismatch);
    }
    let h = pedersen_gens().B_blinding;
    let mut witness = left.blinding() - right.blinding();
    let mut nonce = Scalar::random(&mut OsRng);
    let nonce_point = (nonce * h).compress();

    let c = challenge(label, &left.commit(), &right.commit(), &nonce_point);
    let response = nonce + c * witness;
    nonce.zeroize();
    witness.zeroize();

    let mut proof = Vec::with_capacity(EQUALITY_PROOF_LEN);
    proof.extend_from_slice(nonce_point.as_bytes());
    proof.extend_from_slice(response.as_bytes());
    Ok(proof)
}

/// Verifies that `left` and `right` commit to the same hidden value.
pub fn verify_equality_proof(left: &Commitment, right: &Commitment, proof: &[u8], label: &[u8]) -> bool {
    if proof.len() != EQUALITY_PROOF_LEN {
        return false;
    }
    let (nonce_bytes, response_bytes) = proof.split_at(32);
    let Ok(nonce_point) = CompressedRistretto::from_slice(nonce_bytes) else {
        return false;
    };
    let Ok(response) = crate::scalar::from_bytes(response_bytes) else {
        return false;
    };
    let (Some(nonce), Some(l), Some(r)) = (nonce_point.decompress(), left.to_point(), right.to_point()) else {
        return false;
    };

    let c = challenge(label, left, right, &nonce_point);
    let difference: RistrettoPoint = l - r;
    response * pedersen_gens().B_blinding == nonce + c * difference
}

/// Proves that the parts sum to the source (a sum-zero proof).
pub fn prove_sum(source: &Opening, parts: &[Opening], label: &[u8]) -> Result<Vec<u8>, CommitmentError> {
    let mut value: u32 = 0;
    let mut blinding = Scalar::ZERO;
    for part in parts {
        value = value
            .checked_add(part.value())
            .ok_or(CommitmentError::OutOfRange {
                requested: u64::from(value) + u64::from(part.value()),
                available: u64::from(source.value()),
            })?;
        blinding += part.blinding();
    }
    let total = Opening::new(value, blinding);
    blinding.zeroize();
    prove_equality(source, &total, label)
}

/// Verifies that the homomorphic sum of `parts` commits to the same value as `source`.
pub fn verify_sum_proof(source: &Commitment, parts: &[Commitment], proof: &[u8], label: &[u8]) -> bool {
    if parts.is_empty() {
        return false;
    }
    match Commitment::sum(parts) {
        Some(total) => verify_equality_proof(source, &total, proof, label),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_values_prove_and_verify() {
        let a = Opening::random(150);
        let b = Opening::random(150);
        let proof = prove_equality(&a, &b, b"allocation").unwrap();
        assert_eq!(proof.len(), EQUALITY_PROOF_LEN);
        assert!(verify_equality_proof(&a.commit(), &b.commit(), &proof, b"allocation"));
        assert!(!verify_equality_proof(&a.commit(), &b.commit(), &proof, b"other"));
        assert!(!verify_equality_proof(&b.commit(), &a.commit(), &proof, b"allocation"));
    }

    #[test]
    fn different_values_cannot_be_proven() {
        let a = Opening::random(150);
        let b = Opening::random(151);
        assert_eq!(prove_equality(&a, &b, b"x"), Err(CommitmentError::ValueMismatch));

        // A proof for a matching pair does not transfer to a mismatched one.
        let c = Opening::random(150);
        let proof = prove_equality(&a, &c, b"x").unwrap();
        assert!(!verify_equality_proof(&a.commit(), &b.commit(), &proof, b"x"));
    }

    #[test]
    fn sum_proof_covers_all_parts() {
        let source = Opening::random(250);
        let parts = [Opening::random(150), Opening::random(100)];
        let proof = prove_sum(&source, &parts, b"stream").unwrap();
        let commitments: Vec<_> = parts.iter().map(Opening::commit).collect();
        assert!(verify_sum_proof(&source.commit(), &commitments, &proof, b"stream"));
        assert!(!verify_sum_proof(&source.commit(), &commitments[..1], &proof, b"stream"));
        assert!(!verify_sum_proof(&source.commit(), &[], &proof, b"stream"));
    }

    #[test]
    fn random_bytes_are_not_a_proof() {
        let a = Opening::random(10).commit();
        assert!(!verify_equality_proof(&a, &a, &[0xAB; 64], b"x"));
        assert!(!verify_equality_proof(&a, &a, &[0u8; 63], b"x"));
    }
}
