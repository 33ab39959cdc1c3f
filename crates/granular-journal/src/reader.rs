//! Journal reader implementation.

use crate::errors::JournalError;
use crate::frame::{FrameKind, JournalHeader, RecordFrame, FRAME_HEADER_SIZE, HEADER_SIZE};
use granular_core::Transaction;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Read mode for handling truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Strict mode: truncated frames are errors.
    Strict,
    /// Permissive mode: truncation is treated as end-of-file.
    Permissive,
}

/// Sequential reader over a journal file.
///
/// A crash during append can leave a partial last frame. [`ReadMode::Permissive`]
/// treats it as the end of the journal; [`ReadMode::Strict`] reports it.
pub struct JournalReader {
    file: BufReader<File>,
    mode: ReadMode,
    position: u64,
}

impl JournalReader {
    /// Opens a journal and validates its header.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, JournalError> {
        let mut file = BufReader::new(File::open(path)?);
        let mut header_bytes = [0u8; HEADER_SIZE];
        file.read_exact(&mut header_bytes)?;
        JournalHeader::from_bytes(&header_bytes)?;

        Ok(Self {
            file,
            mode,
            position: HEADER_SIZE as u64,
        })
    }

    /// Current read position in the file.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Reads the next frame; `Ok(None)` at end of file.
    pub fn read_frame(&mut self) -> Result<Option<(FrameKind, Vec<u8>)>, JournalError> {
        let frame_offset = self.position;
        let mut frame_header = [0u8; FRAME_HEADER_SIZE];
        match read_fully(&mut self.file, &mut frame_header)? {
            0 => return Ok(None),
            n if n < FRAME_HEADER_SIZE => return self.truncated(frame_offset),
            _ => {}
        }
        let frame = RecordFrame::from_bytes(&frame_header, frame_offset)?;

        let mut payload = vec![0u8; frame.len as usize];
        if read_fully(&mut self.file, &mut payload)? < payload.len() {
            return self.truncated(frame_offset);
        }
        self.position += (FRAME_HEADER_SIZE + payload.len()) as u64;

        Ok(Some((frame.kind, payload)))
    }

    /// Reads the next transaction, skipping unknown frame kinds.
    pub fn read_transaction(&mut self) -> Result<Option<Transaction>, JournalError> {
        loop {
            let offset = self.position + FRAME_HEADER_SIZE as u64;
            match self.read_frame()? {
                None => return Ok(None),
                Some((FrameKind::Transaction, payload)) => {
                    let transaction = serde_json::from_slice(&payload)
                        .map_err(|source| JournalError::InvalidTransaction { offset, source })?;
                    return Ok(Some(transaction));
                }
                Some((FrameKind::Unknown(kind), _)) => {
                    debug!(kind, offset, "skipping unknown frame");
                }
            }
        }
    }

    /// Reads all remaining transactions.
    pub fn read_all(&mut self) -> Result<Vec<Transaction>, JournalError> {
        let mut transactions = Vec::new();
        while let Some(transaction) = self.read_transaction()? {
            transactions.push(transaction);
        }
        Ok(transactions)
    }

    fn truncated<T>(&self, offset: u64) -> Result<Option<T>, JournalError> {
        match self.mode {
            ReadMode::Permissive => Ok(None),
            ReadMode::Strict => Err(JournalError::TruncatedFrame { offset }),
        }
    }
}

/// Fills `buf` as far as the file allows and returns the byte count.
fn read_fully(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
