//! File-backed [`EventStore`]: one journal per stream in a directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use granular_core::{EventStore, LoaderError, Transaction};
use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::errors::JournalError;
use crate::reader::{JournalReader, ReadMode};
use crate::writer::{JournalWriter, WriteOptions};

/// File extension of stream journals.
pub const JOURNAL_EXTENSION: &str = "gcj";

impl From<JournalError> for LoaderError {
    fn from(err: JournalError) -> Self {
        LoaderError::Unavailable(err.to_string())
    }
}

/// Directory of per-stream journals.
///
/// Appends are serialized within the process; cross-process writers must be
/// serialized by the caller.
#[derive(Debug, Clone)]
pub struct JournalEventStore {
    dir: PathBuf,
    mode: ReadMode,
    options: WriteOptions,
    append_lock: Arc<Mutex<()>>,
}

impl JournalEventStore {
    /// Opens (creating if needed) a journal directory.
    pub fn open(dir: impl Into<PathBuf>, mode: ReadMode) -> Result<Self, JournalError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            mode,
            options: WriteOptions::default(),
            append_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Fsync after every append.
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.options.sync = sync;
        self
    }

    /// Journal file of a stream.
    pub fn stream_path(&self, stream_id: &Uuid) -> PathBuf {
        self.dir.join(format!("{}.{}", stream_id.hyphenated(), JOURNAL_EXTENSION))
    }

    /// Reads a stream synchronously; a missing journal is an empty stream.
    pub fn read_stream(&self, stream_id: &Uuid) -> Result<Vec<Transaction>, JournalError> {
        read_journal(&self.stream_path(stream_id), self.mode)
    }

    /// Appends synchronously.
    pub fn append_sync(&self, transaction: &Transaction) -> Result<(), JournalError> {
        let path = self.stream_path(&transaction.header.federated_stream_id.stream_id);
        let _guard = self.append_lock.lock();
        let mut writer = JournalWriter::open(&path, self.options.clone())?;
        writer.append_transaction(transaction)?;
        writer.finish()?;
        debug!(path = %path.display(), "transaction appended");
        Ok(())
    }
}

fn read_journal(path: &Path, mode: ReadMode) -> Result<Vec<Transaction>, JournalError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    JournalReader::open(path, mode)?.read_all()
}

#[async_trait]
impl EventStore for JournalEventStore {
    async fn get_events(&self, stream_id: &Uuid) -> Result<Vec<Transaction>, LoaderError> {
        let store = self.clone();
        let stream_id = *stream_id;
        tokio::task::spawn_blocking(move || store.read_stream(&stream_id))
            .await
            .map_err(|err| LoaderError::Unavailable(err.to_string()))?
            .map_err(LoaderError::from)
    }

    async fn append(&self, transaction: Transaction) -> Result<(), LoaderError> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.append_sync(&transaction))
            .await
            .map_err(|err| LoaderError::Unavailable(err.to_string()))?
            .map_err(LoaderError::from)
    }
}
