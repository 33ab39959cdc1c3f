//! Append-only journal of signed certificate transactions.
//!
//! This crate provides:
//! - Framed, append-only storage of transaction JSON
//! - Reader/writer APIs with strict and permissive modes
//! - [`JournalEventStore`], a directory of per-stream journals usable as an
//!   [`EventStore`](granular_core::EventStore)
//!
//! ## Format
//!
//! A 16-byte header (`GCJOURNL`, version, flags, reserved) followed by
//! record frames of kind ‖ 3 reserved bytes ‖ payload length ‖ payload.
//! Unknown frame kinds are skipped by readers.

#![deny(missing_docs)]

/// Error types for journal operations.
pub mod errors;
/// Frame structure and serialization.
pub mod frame;
/// Journal reader implementation.
pub mod reader;
/// Per-stream journal directory.
pub mod store;
/// Journal writer implementation.
pub mod writer;

pub use errors::JournalError;
pub use frame::{FrameKind, JournalHeader, RecordFrame};
pub use reader::{JournalReader, ReadMode};
pub use store::JournalEventStore;
pub use writer::{JournalWriter, WriteOptions};
