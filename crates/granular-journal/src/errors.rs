use thiserror::Error;

/// Errors that can occur during journal operations.
#[derive(Error, Debug)]
pub enum JournalError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid file header (magic, version, or flags).
    #[error("invalid journal header: {0}")]
    InvalidHeader(String),
    /// Invalid frame structure (reserved bytes or length).
    #[error("invalid frame at offset {offset}: {reason}")]
    InvalidFrame {
        /// Byte offset where the frame starts.
        offset: u64,
        /// Reason for invalidity.
        reason: String,
    },
    /// Payload exceeds maximum size limit.
    #[error("payload size {size} exceeds maximum {max}")]
    PayloadTooLarge {
        /// Actual payload size.
        size: usize,
        /// Maximum allowed size.
        max: u32,
    },
    /// A transaction frame does not hold a transaction.
    #[error("invalid transaction at offset {offset}: {source}")]
    InvalidTransaction {
        /// Byte offset of the frame payload.
        offset: u64,
        /// JSON decode failure.
        #[source]
        source: serde_json::Error,
    },
    /// Encoding a transaction failed.
    #[error("transaction encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    /// The file has content but not a full header.
    #[error("file is not empty; cannot initialize header")]
    FileNotEmpty,
    /// Truncated frame detected in strict mode.
    #[error("truncated frame at offset {offset}")]
    TruncatedFrame {
        /// Byte offset where truncation occurred.
        offset: u64,
    },
}
