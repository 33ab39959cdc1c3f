//! Journal writer implementation.

use crate::errors::JournalError;
use crate::frame::{FrameKind, JournalHeader, RecordFrame, HEADER_SIZE};
use granular_core::Transaction;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, Write};
use std::path::Path;

/// Options for journal writing.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Whether to fsync after each append (default: false).
    pub sync: bool,
    /// Whether to create the file if it doesn't exist (default: true).
    pub create: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sync: false,
            create: true,
        }
    }
}

/// Append-only writer of transaction frames.
pub struct JournalWriter {
    file: File,
    sync: bool,
}

impl JournalWriter {
    /// Opens or creates a journal for appending.
    ///
    /// An empty file receives a fresh header. An existing file must carry a
    /// valid header; writes go to its end.
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, JournalError> {
        let mut file = OpenOptions::new()
            .create(options.create)
            .write(true)
            .read(true)
            .truncate(false)
            .open(path)?;

        let len = file.metadata()?.len();
        if len == 0 {
            file.write_all(&JournalHeader::new().to_bytes())?;
            file.flush()?;
            if options.sync {
                file.sync_all()?;
            }
        } else if len < HEADER_SIZE as u64 {
            return Err(JournalError::FileNotEmpty);
        } else {
            let mut header_bytes = [0u8; HEADER_SIZE];
            file.seek(io::SeekFrom::Start(0))?;
            file.read_exact(&mut header_bytes)?;
            JournalHeader::from_bytes(&header_bytes)?;
            file.seek(io::SeekFrom::End(0))?;
        }

        Ok(Self {
            file,
            sync: options.sync,
        })
    }

    /// Appends a transaction frame.
    pub fn append_transaction(&mut self, transaction: &Transaction) -> Result<(), JournalError> {
        let payload = serde_json::to_vec(transaction)?;
        self.append_raw(FrameKind::Transaction, &payload)
    }

    /// Appends a raw frame with the given kind and payload.
    pub fn append_raw(&mut self, kind: FrameKind, payload: &[u8]) -> Result<(), JournalError> {
        let frame = RecordFrame::new(kind, payload.len())?;
        let mut record = Vec::with_capacity(frame.to_bytes().len() + payload.len());
        record.extend_from_slice(&frame.to_bytes());
        record.extend_from_slice(payload);
        self.file.write_all(&record)?;
        self.file.flush()?;

        if self.sync {
            self.file.sync_all()?;
        }
        Ok(())
    }

    /// Flushes and closes the file.
    pub fn finish(mut self) -> Result<(), JournalError> {
        self.file.flush()?;
        if self.sync {
            self.file.sync_all()?;
        }
        Ok(())
    }
}
