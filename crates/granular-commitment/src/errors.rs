use thiserror::Error;

/// Errors raised while building commitments or proofs.
///
/// Verification never returns these; a proof that does not check out is a
/// `false` or an `Invalid` verdict.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommitmentError {
    /// Commitment bytes have the wrong length.
    #[error("commitment must be 32 bytes, got {0}")]
    InvalidLength(usize),
    /// Scalar bytes are not a canonical encoding.
    #[error("scalar is not canonically encoded")]
    NonCanonicalScalar,
    /// Equality proofs require both openings to hide the same value.
    #[error("openings hide different values")]
    ValueMismatch,
    /// A requested split exceeds the source quantity or overflows.
    #[error("quantity {requested} is out of range for source {available}")]
    OutOfRange {
        /// Requested quantity.
        requested: u64,
        /// Available quantity.
        available: u64,
    },
    /// The range prover rejected its input.
    #[error("range proof generation failed: {0}")]
    RangeProof(String),
}
