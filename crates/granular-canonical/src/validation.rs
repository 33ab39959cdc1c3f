use thiserror::Error;

/// Validation errors for canonical primitives.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// When a value does not match the required pattern.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// When decoded bytes have the wrong length.
    #[error("{field} must be {expected} bytes, got {actual}")]
    InvalidLength {
        /// Field name that failed validation.
        field: &'static str,
        /// Required length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
    /// When a period does not start before it ends.
    #[error("period start {start} is not before end {end}")]
    EmptyPeriod {
        /// Period start (RFC3339).
        start: String,
        /// Period end (RFC3339).
        end: String,
    },
}
