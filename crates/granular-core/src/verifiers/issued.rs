use std::sync::Arc;

use chrono::Duration;
use granular_canonical::VerificationResult;
use granular_commitment::{verify_opening, verify_range_proof};

use super::{ensure, into_verdict, Check, EventVerifier, VerificationContext};
use crate::events::IssuedEvent;
use crate::issuers::IssuerKeyRegistry;

/// Verifies certificate issuance against the issuer key snapshot.
#[derive(Debug, Clone)]
pub struct IssuedVerifier {
    issuers: Arc<IssuerKeyRegistry>,
}

impl IssuedVerifier {
    /// Verifier bound to one registry snapshot.
    pub fn new(issuers: Arc<IssuerKeyRegistry>) -> Self {
        Self { issuers }
    }

    fn check(&self, context: &VerificationContext<'_>, event: &IssuedEvent) -> Check {
        ensure(
            context.certificate.is_none(),
            format!("Certificate with id ”{}” already exists", event.certificate_id.stream_id),
        )?;

        let quantity = &event.quantity_commitment;
        let label = event.certificate_id.proof_label();
        ensure(
            verify_range_proof(&quantity.commitment, &quantity.range_proof, label.as_bytes()),
            "Invalid range proof for Quantity commitment",
        )?;
        if let Some(opening) = &event.public_quantity {
            ensure(verify_opening(&quantity.commitment, opening), "Invalid public quantity")?;
        }

        let duration = event.period.duration();
        ensure(duration >= Duration::minutes(1), "Invalid period, minimum period is 1 minute")?;
        ensure(duration <= Duration::hours(1), "Invalid period, maximum period is 1 hour")?;

        ensure(
            event.owner_public_key.to_verifying_key().is_some(),
            "Invalid owner key, not a valid publicKey",
        )?;

        let issuer_keys = self.issuers.issuer_keys(&event.grid_area);
        ensure(
            !issuer_keys.is_empty(),
            format!("No issuer found for GridArea ”{}”", event.grid_area),
        )?;
        ensure(
            issuer_keys.iter().any(|key| context.transaction.is_signature_valid(key)),
            format!("Invalid issuer signature for GridArea ”{}”", event.grid_area),
        )
    }
}

impl EventVerifier<IssuedEvent> for IssuedVerifier {
    fn verify(&self, context: &VerificationContext<'_>, event: &IssuedEvent) -> VerificationResult {
        into_verdict(self.check(context, event))
    }
}
