//! One verifier per event kind.
//!
//! Verifiers are pure: they read an immutable snapshot of the target
//! certificate (and, for cross-stream events, its counterpart) and return a
//! [`VerificationResult`]. Checks run in a fixed order and the first failure
//! is the reported reason.

use granular_canonical::VerificationResult;

use crate::model::GranularCertificate;
use crate::transaction::Transaction;

mod allocated;
mod claimed;
mod issued;
mod sliced;
mod transferred;

pub use allocated::AllocatedVerifier;
pub use claimed::ClaimedVerifier;
pub use issued::IssuedVerifier;
pub use sliced::SlicedVerifier;
pub use transferred::TransferredVerifier;

/// Snapshot a single verification runs against.
#[derive(Debug, Clone, Copy)]
pub struct VerificationContext<'a> {
    /// Transaction being verified.
    pub transaction: &'a Transaction,
    /// Projected target certificate, if it exists.
    pub certificate: Option<&'a GranularCertificate>,
    /// Projected counterpart certificate for allocations and claims.
    pub counterpart: Option<&'a GranularCertificate>,
}

impl<'a> VerificationContext<'a> {
    /// Context for a single-stream event.
    pub fn new(transaction: &'a Transaction, certificate: Option<&'a GranularCertificate>) -> Self {
        Self {
            transaction,
            certificate,
            counterpart: None,
        }
    }

    /// Adds the counterpart snapshot.
    pub fn with_counterpart(mut self, counterpart: Option<&'a GranularCertificate>) -> Self {
        self.counterpart = counterpart;
        self
    }
}

/// Decides whether an event of type `E` may be appended.
pub trait EventVerifier<E> {
    /// Runs the ordered checks for `event`.
    fn verify(&self, context: &VerificationContext<'_>, event: &E) -> VerificationResult;
}

/// Outcome of one ordered check; `Err` carries the reason.
type Check = Result<(), String>;

fn ensure(condition: bool, reason: impl Into<String>) -> Check {
    if condition {
        Ok(())
    } else {
        Err(reason.into())
    }
}

fn require<T>(value: Option<T>, reason: &str) -> Result<T, String> {
    value.ok_or_else(|| reason.to_string())
}

fn into_verdict(check: Check) -> VerificationResult {
    match check {
        Ok(()) => VerificationResult::Valid,
        Err(reason) => VerificationResult::Invalid(reason),
    }
}
