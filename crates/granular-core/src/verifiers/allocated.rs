use granular_canonical::VerificationResult;
use granular_commitment::verify_equality_proof;

use super::{ensure, into_verdict, require, Check, EventVerifier, VerificationContext};
use crate::events::{AllocatedEvent, CertificateType};

/// Verifies one side of an allocation.
///
/// The production side is allocated first, against an active consumption
/// slice. The consumption side then requires the production certificate to
/// already hold the matching allocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocatedVerifier;

impl AllocatedVerifier {
    fn check(&self, context: &VerificationContext<'_>, event: &AllocatedEvent) -> Check {
        let certificate = require(context.certificate, "Certificate does not exist")?;
        let side = certificate.certificate_type();
        ensure(
            event.certificate_id(side) == certificate.id(),
            "Certificate is not part of the allocation",
        )?;

        let (other_side, counterpart_missing, local_slice_missing) = match side {
            CertificateType::Production => (
                CertificateType::Consumption,
                "ConsumptionCertificate does not exist",
                "Production slice does not exist",
            ),
            CertificateType::Consumption => (
                CertificateType::Production,
                "ProductionCertificate does not exist",
                "Consumption slice does not exist",
            ),
        };
        let counterpart = require(context.counterpart, counterpart_missing)?;
        ensure(
            counterpart.certificate_type() == other_side
                && counterpart.id() == event.certificate_id(other_side),
            "Counterpart certificate has the wrong type",
        )?;

        let local_slice = require(
            certificate.get_certificate_slice(event.source_slice(side)),
            local_slice_missing,
        )?;
        let counterpart_commitment = match side {
            CertificateType::Production => {
                require(
                    counterpart.get_certificate_slice(&event.consumption_source_slice),
                    "Consumption slice does not exist",
                )?
                .commitment
            }
            CertificateType::Consumption => {
                let allocation = require(
                    counterpart.get_allocation(&event.allocation_id),
                    "Production not allocated",
                )?;
                ensure(
                    allocation.production_source_slice == event.production_source_slice
                        && allocation.consumption_source_slice == event.consumption_source_slice
                        && allocation.production_certificate_id == event.production_certificate_id
                        && allocation.consumption_certificate_id == event.consumption_certificate_id,
                    "Production allocation does not match",
                )?;
                allocation.slice.commitment
            }
        };

        ensure(
            context.transaction.is_signature_valid(&local_slice.owner),
            "Invalid signature for slice",
        )?;
        ensure(
            certificate.period() == counterpart.period(),
            "Certificates are not in the same period",
        )?;
        ensure(
            certificate.grid_area() == counterpart.grid_area(),
            "Certificates are not in the same area",
        )?;

        let (production, consumption) = match side {
            CertificateType::Production => (local_slice.commitment, counterpart_commitment),
            CertificateType::Consumption => (counterpart_commitment, local_slice.commitment),
        };
        ensure(
            verify_equality_proof(
                &production,
                &consumption,
                &event.equality_proof,
                event.proof_label().as_bytes(),
            ),
            "Invalid Equality proof",
        )?;
        ensure(
            !certificate.has_allocation_id(&event.allocation_id),
            "Allocation id already in use",
        )
    }
}

impl EventVerifier<AllocatedEvent> for AllocatedVerifier {
    fn verify(&self, context: &VerificationContext<'_>, event: &AllocatedEvent) -> VerificationResult {
        into_verdict(self.check(context, event))
    }
}
