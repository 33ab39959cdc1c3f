use std::path::PathBuf;
use std::time::Duration;

use granular_canonical::{CanonicalizationError, FederatedStreamId, GridArea, RegistryName};
use thiserror::Error;
use uuid::Uuid;

/// Core error types.
///
/// These are operational failures. Verification outcomes are never errors;
/// they are carried by [`granular_canonical::VerificationResult`].
#[derive(Error, Debug)]
pub enum CoreError {
    /// Canonicalization error.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
    /// The model loader could not supply a snapshot.
    #[error("model loader failed: {0}")]
    Loader(#[from] LoaderError),
}

/// Failure to decode a transaction payload into a typed event.
#[derive(Error, Debug)]
pub enum PayloadError {
    /// The header names a payload type no verifier handles.
    #[error("unsupported payload type {0:?}")]
    UnsupportedType(String),
    /// The payload bytes are not a valid event of the declared type.
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Failures of the model loader and event store collaborators.
///
/// A loader failure is retryable and never stands in for "certificate does
/// not exist".
#[derive(Error, Debug)]
pub enum LoaderError {
    /// No store is configured for the registry.
    #[error("unknown registry {0}")]
    UnknownRegistry(RegistryName),
    /// The store could not be reached or read.
    #[error("event store unavailable: {0}")]
    Unavailable(String),
    /// A remote fetch exceeded its deadline.
    #[error("model fetch timed out after {0:?}")]
    Timeout(Duration),
    /// A stored transaction could not be decoded.
    #[error("stored stream {stream} is corrupt: {source}")]
    Corrupt {
        /// Offending stream.
        stream: FederatedStreamId,
        /// Decode failure.
        #[source]
        source: PayloadError,
    },
    /// Appending would break the stream's invariants.
    #[error("stream {stream} rejected append: {reason}")]
    Rejected {
        /// Target stream.
        stream: Uuid,
        /// Why the append was refused.
        reason: String,
    },
}

/// Network configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Configuration path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The YAML document is malformed.
    #[error("invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// An issuer key is not a valid Ed25519 public key.
    #[error("invalid issuer key for grid area {area}: {reason}")]
    InvalidIssuerKey {
        /// Grid area the key was listed under.
        area: GridArea,
        /// What is wrong with the key.
        reason: String,
    },
}
