use bulletproofs::RangeProof;
use merlin::Transcript;

use crate::commitment::{Commitment, Opening};
use crate::errors::CommitmentError;
use crate::generators::{bulletproof_gens, pedersen_gens};

/// Bit width of proven quantities.
pub const RANGE_BITS: usize = 32;

const RANGE_PROOF_DOMAIN: &[u8] = b"granular-certificate/range-proof";

fn transcript(label: &[u8]) -> Transcript {
    let mut transcript = Transcript::new(RANGE_PROOF_DOMAIN);
    transcript.append_message(b"label", label);
    transcript
}

/// Proves that the opening's value lies in `[0, 2^32)`.
///
/// `label` binds the proof to its context (stream, slice or allocation id) so
/// it cannot be replayed onto another commitment elsewhere.
pub fn prove_range(opening: &Opening, label: &[u8]) -> Result<Vec<u8>, CommitmentError> {
    let (proof, _) = RangeProof::prove_single(
        bulletproof_gens(),
        pedersen_gens(),
        &mut transcript(label),
        u64::from(opening.value()),
        opening.blinding(),
        RANGE_BITS,
    )
    .map_err(|e| CommitmentError::RangeProof(e.to_string()))?;
    Ok(proof.to_bytes())
}

/// Verifies a serialized range proof for `commitment` under `label`.
pub fn verify_range_proof(commitment: &Commitment, proof: &[u8], label: &[u8]) -> bool {
    let Ok(proof) = RangeProof::from_bytes(proof) else {
        return false;
    };
    let compressed = curve25519_dalek::ristretto::CompressedRistretto(*commitment.as_bytes());
    proof
        .verify_single(
            bulletproof_gens(),
            pedersen_gens(),
            &mut transcript(label),
            &compressed,
            RANGE_BITS,
        )
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_proof_is_bound_to_label_and_commitment() {
        let opening = Opening::random(250);
        let commitment = opening.commit();
        let proof = prove_range(&opening, b"stream-a").unwrap();

        assert!(verify_range_proof(&commitment, &proof, b"stream-a"));
        assert!(!verify_range_proof(&commitment, &proof, b"stream-b"));
        assert!(!verify_range_proof(&Opening::random(250).commit(), &proof, b"stream-a"));
    }

    #[test]
    fn garbage_proof_is_rejected() {
        let commitment = Opening::random(1).commit();
        assert!(!verify_range_proof(&commitment, &[], b"x"));
        assert!(!verify_range_proof(&commitment, &[7u8; 100], b"x"));
    }
}
