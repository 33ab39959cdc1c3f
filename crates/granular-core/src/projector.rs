//! Folds an ordered event stream into a [`GranularCertificate`].
//!
//! The projector trusts its input: only verified events are ever appended,
//! so effects on missing state are skipped rather than failing the fold.

use tracing::warn;

use crate::errors::PayloadError;
use crate::events::CertificateEvent;
use crate::model::GranularCertificate;
use crate::transaction::Transaction;

/// Projects events in stream order. `None` unless the first event is an issuance.
pub fn project<'a>(events: impl IntoIterator<Item = &'a CertificateEvent>) -> Option<GranularCertificate> {
    let mut events = events.into_iter();
    let mut certificate = match events.next()? {
        CertificateEvent::Issued(issued) => GranularCertificate::issue(issued)?,
        other => {
            warn!(kind = ?other.kind(), "stream does not start with an issued event");
            return None;
        }
    };
    for event in events {
        certificate.apply(event);
    }
    Some(certificate)
}

/// Decodes stored transactions and projects them.
pub fn project_transactions(
    transactions: &[Transaction],
) -> Result<Option<GranularCertificate>, PayloadError> {
    let events = transactions
        .iter()
        .map(Transaction::decode_event)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(project(&events))
}
