use std::collections::BTreeSet;

use granular_canonical::VerificationResult;
use granular_commitment::{
    verify_range_proof, verify_slice_conservation, verify_sum_proof, Commitment, SplitCommitments,
};

use super::{ensure, into_verdict, require, Check, EventVerifier, VerificationContext};
use crate::events::{ConservationProof, SlicedEvent};

/// Verifies that a slice is split by its owner without creating quantity.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlicedVerifier;

impl SlicedVerifier {
    fn check(&self, context: &VerificationContext<'_>, event: &SlicedEvent) -> Check {
        let certificate = require(context.certificate, "Certificate does not exist")?;
        let source = require(certificate.get_certificate_slice(&event.source_slice), "Slice not found")?;
        ensure(
            context.transaction.is_signature_valid(&source.owner),
            "Invalid signature for slice",
        )?;
        ensure(!event.new_slices.is_empty(), "Sliced event has no new slices")?;

        for new_slice in &event.new_slices {
            ensure(
                new_slice.new_owner.to_verifying_key().is_some(),
                "Invalid NewOwner key, not a valid publicKey",
            )?;
        }

        let mut minted = BTreeSet::new();
        for new_slice in &event.new_slices {
            let id = new_slice.quantity.commitment.slice_id();
            ensure(
                !certificate.is_slice_id_used(&id) && minted.insert(id),
                "Slice id already in use",
            )?;
        }

        let label = event.certificate_id.proof_label();
        for new_slice in &event.new_slices {
            let quantity = &new_slice.quantity;
            ensure(
                verify_range_proof(&quantity.commitment, &quantity.range_proof, label.as_bytes()),
                "Invalid range proof for new slice",
            )?;
        }

        let parts: Vec<Commitment> = event.new_slices.iter().map(|s| s.quantity.commitment).collect();
        match &event.conservation {
            ConservationProof::SumProof { proof } => ensure(
                verify_sum_proof(&source.commitment, &parts, proof, label.as_bytes()),
                "Invalid sum proof",
            ),
            ConservationProof::DisclosedSplit {
                source: source_opening,
                quantity,
                remainder,
                zero_randomizer,
            } => {
                let [quantity_commitment, remainder_commitment] = parts.as_slice() else {
                    return Err("Disclosed split requires exactly two new slices".to_string());
                };
                let commitments = SplitCommitments {
                    source: &source.commitment,
                    quantity: quantity_commitment,
                    remainder: remainder_commitment,
                };
                match verify_slice_conservation(&commitments, source_opening, quantity, remainder, zero_randomizer) {
                    VerificationResult::Valid => Ok(()),
                    VerificationResult::Invalid(reason) => Err(reason),
                }
            }
        }
    }
}

impl EventVerifier<SlicedEvent> for SlicedVerifier {
    fn verify(&self, context: &VerificationContext<'_>, event: &SlicedEvent) -> VerificationResult {
        into_verdict(self.check(context, event))
    }
}
