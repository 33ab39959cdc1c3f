//! Canonical data model primitives for the granular certificate ledger.
//!
//! Every type that participates in hashing, signing or a verification verdict
//! lives in this crate so that the commitment, core and journal crates agree
//! on a single encoding:
//! - Federated stream identifiers and grid areas
//! - Certificate periods
//! - Slice identifiers (content digests of commitments)
//! - Canonical JSON bytes for signing and payload hashing
//! - The two-variant verification verdict
//!
#![deny(missing_docs)]

/// Base64 helpers for byte-string fields.
pub mod bytes;
/// Canonical JSON encoding for deterministic hashing and signing.
pub mod canonicalizer;
/// Content digests used as slice identifiers.
pub mod digest;
/// Stream, registry and grid area identifiers.
pub mod identifiers;
/// Certificate period.
pub mod period;
/// Validation helpers used by canonical types.
pub mod validation;
/// Verification verdict.
pub mod verdict;

pub use canonicalizer::{canonical_bytes, CanonicalizationError};
pub use digest::SliceId;
pub use identifiers::{FederatedStreamId, GridArea, RegistryName};
pub use period::Period;
pub use validation::ValidationError;
pub use verdict::VerificationResult;
