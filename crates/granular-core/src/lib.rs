//! Certificate state and transaction verification for the granular
//! certificate ledger.
//!
//! This crate provides:
//! - Event payloads and the signed transaction envelope
//! - The certificate aggregate and the projector folding a stream into it
//! - One pure verifier per event kind
//! - Issuer key configuration, event store and model loader seams
//! - The dispatcher tying loaders and verifiers together
//!
//! Core invariants:
//! - Verifiers are pure; the first failing check is the reported reason
//! - Operational failures are errors, never verdicts
//! - Opening values are never logged or retained in projected state
//!
#![deny(missing_docs)]

/// Verification dispatch.
pub mod dispatcher;
/// Error types for core operations.
pub mod errors;
/// Event payload types.
pub mod events;
/// Issuer key registry and network configuration.
pub mod issuers;
/// Public key bytes.
pub mod keys;
/// Event store and model loader traits with in-memory implementations.
pub mod loader;
/// The certificate aggregate.
pub mod model;
/// Folding event streams into aggregates.
pub mod projector;
/// Signed transactions.
pub mod transaction;
/// Per-event-kind verifiers.
pub mod verifiers;

pub use dispatcher::VerificationDispatcher;
pub use errors::{ConfigError, CoreError, LoaderError, PayloadError};
pub use events::{
    AllocatedEvent, CertificateEvent, CertificateType, ClaimedEvent, ConservationProof, EventKind,
    IssuedEvent, NewSlice, QuantityCommitment, SlicedEvent, TransferredEvent,
};
pub use issuers::{IssuerKeyRegistry, IssuerRegistryHandle, NetworkConfig, RegistryInfo};
pub use keys::PublicKeyBytes;
pub use loader::{
    EventStore, FederatedModelLoader, MemoryEventStore, ModelLoader, RemoteModelLoader,
    TimeoutModelLoader,
};
pub use model::{AllocationSlice, CertificateSlice, GranularCertificate};
pub use projector::{project, project_transactions};
pub use transaction::{Transaction, TransactionHeader};
pub use verifiers::{EventVerifier, VerificationContext};
