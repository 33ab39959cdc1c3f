//! Routes a transaction to the verifier for its event kind.
//!
//! The dispatcher owns all I/O: it validates the envelope, loads the local
//! snapshot (and the counterpart for allocations and claims), then hands a
//! pure [`VerificationContext`] to the matching verifier. Loader failures
//! surface as errors and never become verdicts.

use std::sync::Arc;

use granular_canonical::{FederatedStreamId, VerificationResult};
use tracing::{debug, info};

use crate::errors::{CoreError, LoaderError, PayloadError};
use crate::events::CertificateEvent;
use crate::issuers::IssuerRegistryHandle;
use crate::loader::{ModelLoader, RemoteModelLoader};
use crate::model::GranularCertificate;
use crate::projector::project_transactions;
use crate::transaction::Transaction;
use crate::verifiers::{
    AllocatedVerifier, ClaimedVerifier, EventVerifier, IssuedVerifier, SlicedVerifier,
    TransferredVerifier, VerificationContext,
};

/// Entry point for verifying transactions.
#[derive(Clone)]
pub struct VerificationDispatcher {
    local: Arc<dyn ModelLoader>,
    remote: Arc<dyn RemoteModelLoader>,
    issuers: IssuerRegistryHandle,
}

impl VerificationDispatcher {
    /// Dispatcher reading local streams from `local` and counterparts from `remote`.
    pub fn new(
        local: Arc<dyn ModelLoader>,
        remote: Arc<dyn RemoteModelLoader>,
        issuers: IssuerRegistryHandle,
    ) -> Self {
        Self { local, remote, issuers }
    }

    /// Verifies `transaction` against the current state of its stream.
    pub async fn verify(&self, transaction: &Transaction) -> Result<VerificationResult, CoreError> {
        let event = match check_envelope(transaction) {
            Ok(event) => event,
            Err(verdict) => return Ok(report(transaction, verdict)),
        };
        let (certificate, events) = self.local.get(&transaction.header.federated_stream_id).await?;
        debug!(stream = %transaction.header.federated_stream_id, events, "local snapshot loaded");
        self.verify_event(transaction, &event, certificate.as_ref()).await
    }

    /// Verifies `transaction` against a caller-supplied history of its stream.
    ///
    /// Counterparts are still fetched through the remote loader.
    pub async fn verify_with_stream(
        &self,
        transaction: &Transaction,
        stream: &[Transaction],
    ) -> Result<VerificationResult, CoreError> {
        let event = match check_envelope(transaction) {
            Ok(event) => event,
            Err(verdict) => return Ok(report(transaction, verdict)),
        };
        let certificate = project_transactions(stream).map_err(|source| LoaderError::Corrupt {
            stream: transaction.header.federated_stream_id.clone(),
            source,
        })?;
        self.verify_event(transaction, &event, certificate.as_ref()).await
    }

    async fn verify_event(
        &self,
        transaction: &Transaction,
        event: &CertificateEvent,
        certificate: Option<&GranularCertificate>,
    ) -> Result<VerificationResult, CoreError> {
        let counterpart = match counterpart_id(event, certificate) {
            Some(id) => self.remote.get_model(&id).await?,
            None => None,
        };
        let context = VerificationContext::new(transaction, certificate).with_counterpart(counterpart.as_ref());

        let verdict = match event {
            CertificateEvent::Issued(e) => IssuedVerifier::new(self.issuers.snapshot()).verify(&context, e),
            CertificateEvent::Sliced(e) => SlicedVerifier.verify(&context, e),
            CertificateEvent::Transferred(e) => TransferredVerifier.verify(&context, e),
            CertificateEvent::Allocated(e) => AllocatedVerifier.verify(&context, e),
            CertificateEvent::Claimed(e) => ClaimedVerifier.verify(&context, e),
        };
        Ok(report(transaction, verdict))
    }
}

/// Envelope checks shared by both entry points.
fn check_envelope(transaction: &Transaction) -> Result<CertificateEvent, VerificationResult> {
    if !transaction.payload_hash_matches() {
        return Err(VerificationResult::invalid("Invalid payload hash"));
    }
    let event = transaction.decode_event().map_err(|err| match err {
        PayloadError::UnsupportedType(name) => {
            VerificationResult::invalid(format!("Unsupported payload type ”{name}”"))
        }
        PayloadError::Malformed(_) => VerificationResult::invalid("Invalid payload"),
    })?;
    if !event.targets(&transaction.header.federated_stream_id) {
        return Err(VerificationResult::invalid("Transaction stream does not match event"));
    }
    Ok(event)
}

/// Stream whose snapshot the verifier needs besides the target's own.
fn counterpart_id(
    event: &CertificateEvent,
    certificate: Option<&GranularCertificate>,
) -> Option<FederatedStreamId> {
    match event {
        CertificateEvent::Allocated(e) => {
            let other = certificate?.certificate_type().opposite();
            Some(e.certificate_id(other).clone())
        }
        CertificateEvent::Claimed(e) => {
            let certificate = certificate?;
            let allocation = certificate.get_allocation(&e.allocation_id)?;
            Some(allocation.counterpart(certificate.certificate_type()).clone())
        }
        _ => None,
    }
}

fn report(transaction: &Transaction, verdict: VerificationResult) -> VerificationResult {
    let stream = &transaction.header.federated_stream_id;
    match &verdict {
        VerificationResult::Valid => {
            debug!(%stream, payload_type = %transaction.header.payload_type, "transaction valid");
        }
        VerificationResult::Invalid(reason) => {
            info!(%stream, payload_type = %transaction.header.payload_type, %reason, "transaction invalid");
        }
    }
    verdict
}
