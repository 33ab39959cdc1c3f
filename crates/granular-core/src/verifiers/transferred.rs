use granular_canonical::VerificationResult;

use super::{ensure, into_verdict, require, Check, EventVerifier, VerificationContext};
use crate::events::TransferredEvent;

/// Verifies that a slice is handed over by its current owner.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferredVerifier;

impl TransferredVerifier {
    fn check(&self, context: &VerificationContext<'_>, event: &TransferredEvent) -> Check {
        let certificate = require(context.certificate, "Certificate does not exist")?;
        let slice = require(certificate.get_certificate_slice(&event.source_slice), "Slice not found")?;
        ensure(
            context.transaction.is_signature_valid(&slice.owner),
            "Invalid signature for slice",
        )?;
        ensure(
            event.new_owner.to_verifying_key().is_some(),
            "Invalid NewOwner key, not a valid publicKey",
        )
    }
}

impl EventVerifier<TransferredEvent> for TransferredVerifier {
    fn verify(&self, context: &VerificationContext<'_>, event: &TransferredEvent) -> VerificationResult {
        into_verdict(self.check(context, event))
    }
}
