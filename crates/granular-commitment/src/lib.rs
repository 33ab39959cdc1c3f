//! Commitment and proof verification for hidden certificate quantities.
//!
//! Quantities are Pedersen commitments `C = v·G + r·H` over Ristretto255.
//! This crate wraps the group arithmetic and Bulletproofs primitives into the
//! domain operations the certificate verifiers need:
//! - Opening verification ([`verify_opening`])
//! - Range proofs bound to a context label ([`verify_range_proof`])
//! - Slice conservation with disclosed openings ([`verify_slice_conservation`])
//! - Equality and sum-zero proofs between commitments ([`verify_equality_proof`],
//!   [`verify_sum_proof`])
//!
//! Openings are secret. They zeroize on drop and never print their contents.
#![deny(missing_docs)]

/// Commitments and openings.
pub mod commitment;
/// Slice conservation with disclosed openings.
pub mod conservation;
/// Equality and sum-zero proofs.
pub mod equality;
/// Error types.
pub mod errors;
/// Fixed Pedersen and Bulletproof generators.
pub mod generators;
/// Range proofs.
pub mod range_proof;
/// Serde adapter for scalars.
pub mod scalar;

pub use commitment::{verify_opening, Commitment, Opening};
pub use conservation::{split_opening, verify_slice_conservation, SplitCommitments, SplitWitness};
pub use equality::{prove_equality, prove_sum, verify_equality_proof, verify_sum_proof, EQUALITY_PROOF_LEN};
pub use errors::CommitmentError;
pub use range_proof::{prove_range, verify_range_proof, RANGE_BITS};

pub use curve25519_dalek::scalar::Scalar;
