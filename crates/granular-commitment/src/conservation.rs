use curve25519_dalek::scalar::Scalar;
use granular_canonical::VerificationResult;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::commitment::{verify_opening, Commitment, Opening};
use crate::errors::CommitmentError;

/// Public commitments of a two-way split of a source slice.
#[derive(Debug, Clone, Copy)]
pub struct SplitCommitments<'a> {
    /// Commitment of the slice being split.
    pub source: &'a Commitment,
    /// Commitment of the transferred quantity.
    pub quantity: &'a Commitment,
    /// Commitment of what stays behind.
    pub remainder: &'a Commitment,
}

/// Verifies that a split conserves the source quantity.
///
/// Checks run in a fixed order and the first failure is reported. Together
/// they establish `quantity + remainder = source` and `0 < quantity ≤ source`.
/// `zero_randomizer` is the value supplied alongside the split; it must equal
/// `source.r − (quantity.r + remainder.r)` and the commitment to zero under it
/// must equal `source − (quantity + remainder)`.
pub fn verify_slice_conservation(
    commitments: &SplitCommitments<'_>,
    source: &Opening,
    quantity: &Opening,
    remainder: &Opening,
    zero_randomizer: &Scalar,
) -> VerificationResult {
    if quantity.value() > source.value() {
        return VerificationResult::invalid("Transfer larger than source");
    }

    if quantity.value() == 0 {
        return VerificationResult::invalid("Negative or zero transfer not allowed");
    }

    if !verify_opening(commitments.source, source) {
        return VerificationResult::invalid("Calculated Source commitment does not equal the parameters");
    }

    if !verify_opening(commitments.quantity, quantity) {
        return VerificationResult::invalid("Calculated Transferred commitment does not equal the parameters");
    }

    if !verify_opening(commitments.remainder, remainder) {
        return VerificationResult::invalid("Calculated Remainder commitment does not equal the parameters");
    }

    let mut r_zero = source.blinding() - (quantity.blinding() + remainder.blinding());
    let randomizer_matches = r_zero == *zero_randomizer;
    let zero_commitment = Opening::new(0, r_zero).commit();
    r_zero.zeroize();
    if !randomizer_matches {
        return VerificationResult::invalid("R to zero is not valid");
    }

    let (Some(s), Some(q), Some(r)) = (
        commitments.source.to_point(),
        commitments.quantity.to_point(),
        commitments.remainder.to_point(),
    ) else {
        return VerificationResult::invalid("R to zero is not valid");
    };
    if zero_commitment != Commitment::from_point(&(s - (q + r))) {
        return VerificationResult::invalid("R to zero is not valid");
    }

    VerificationResult::Valid
}

/// Prover-side material for splitting a slice in two.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SplitWitness {
    /// Opening of the transferred quantity.
    pub quantity: Opening,
    /// Opening of the remainder.
    pub remainder: Opening,
    /// `source.r − (quantity.r + remainder.r)`.
    pub zero_randomizer: Scalar,
}

/// Splits `source` into `quantity` and the remainder with fresh blindings.
pub fn split_opening(source: &Opening, quantity: u32) -> Result<SplitWitness, CommitmentError> {
    let remainder_value = source
        .value()
        .checked_sub(quantity)
        .ok_or(CommitmentError::OutOfRange {
            requested: u64::from(quantity),
            available: u64::from(source.value()),
        })?;
    let quantity = Opening::random(quantity);
    let remainder = Opening::random(remainder_value);
    let zero_randomizer = source.blinding() - (quantity.blinding() + remainder.blinding());
    Ok(SplitWitness {
        quantity,
        remainder,
        zero_randomizer,
    })
}
