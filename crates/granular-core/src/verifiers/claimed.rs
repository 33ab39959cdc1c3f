use granular_canonical::VerificationResult;

use super::{ensure, into_verdict, require, Check, EventVerifier, VerificationContext};
use crate::events::{CertificateType, ClaimedEvent};

/// Verifies that an allocation may be finalised on one side.
///
/// Production claims once the consumption side holds the allocation;
/// consumption claims once production has claimed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimedVerifier;

impl ClaimedVerifier {
    fn check(&self, context: &VerificationContext<'_>, event: &ClaimedEvent) -> Check {
        let certificate = require(context.certificate, "Certificate does not exist")?;
        let allocation = require(
            certificate.get_allocation(&event.allocation_id),
            "Allocation does not exist",
        )?;
        ensure(
            context.transaction.is_signature_valid(&allocation.slice.owner),
            "Invalid signature for slice",
        )?;

        match certificate.certificate_type() {
            CertificateType::Production => {
                let counterpart = require(context.counterpart, "ConsumptionCertificate does not exist")?;
                ensure(
                    counterpart.has_allocation_id(&event.allocation_id),
                    "Consumption not allocated",
                )
            }
            CertificateType::Consumption => {
                let counterpart = require(context.counterpart, "ProductionCertificate does not exist")?;
                ensure(
                    counterpart.get_claim(&event.allocation_id).is_some(),
                    "Production not claimed",
                )
            }
        }
    }
}

impl EventVerifier<ClaimedEvent> for ClaimedVerifier {
    fn verify(&self, context: &VerificationContext<'_>, event: &ClaimedEvent) -> VerificationResult {
        into_verdict(self.check(context, event))
    }
}
