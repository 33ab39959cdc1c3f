//! Event store and model loader seams.
//!
//! Every call folds a fresh snapshot from the store; nothing is cached
//! between verifications because certificates change between submissions.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use granular_canonical::{FederatedStreamId, RegistryName};
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::errors::LoaderError;
use crate::model::GranularCertificate;
use crate::projector::project_transactions;
use crate::transaction::Transaction;

/// Append-only storage of one registry's transactions, keyed by stream UUID.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// All transactions of a stream in append order; empty if unknown.
    async fn get_events(&self, stream_id: &Uuid) -> Result<Vec<Transaction>, LoaderError>;

    /// Appends a transaction to the stream named in its header.
    async fn append(&self, transaction: Transaction) -> Result<(), LoaderError>;
}

/// In-memory [`EventStore`].
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    streams: RwLock<HashMap<Uuid, Vec<Transaction>>>,
}

impl MemoryEventStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn get_events(&self, stream_id: &Uuid) -> Result<Vec<Transaction>, LoaderError> {
        Ok(self.streams.read().get(stream_id).cloned().unwrap_or_default())
    }

    async fn append(&self, transaction: Transaction) -> Result<(), LoaderError> {
        let stream_id = transaction.header.federated_stream_id.stream_id;
        self.streams.write().entry(stream_id).or_default().push(transaction);
        Ok(())
    }
}

/// Supplies projected aggregates from the local registries.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    /// Aggregate of `id` (or `None` if the stream is empty or not issued)
    /// and the number of stored events.
    async fn get(&self, id: &FederatedStreamId) -> Result<(Option<GranularCertificate>, usize), LoaderError>;
}

/// Supplies projected aggregates from any registry, possibly over the network.
#[async_trait]
pub trait RemoteModelLoader: Send + Sync {
    /// Aggregate of `id`, `None` if it does not exist.
    async fn get_model(&self, id: &FederatedStreamId) -> Result<Option<GranularCertificate>, LoaderError>;
}

#[async_trait]
impl<T: RemoteModelLoader + ?Sized> RemoteModelLoader for Arc<T> {
    async fn get_model(&self, id: &FederatedStreamId) -> Result<Option<GranularCertificate>, LoaderError> {
        (**self).get_model(id).await
    }
}

/// Routes lookups to per-registry event stores.
#[derive(Default, Clone)]
pub struct FederatedModelLoader {
    stores: HashMap<RegistryName, Arc<dyn EventStore>>,
}

impl FederatedModelLoader {
    /// Loader with no registries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the store backing `registry`.
    pub fn with_store(mut self, registry: impl Into<RegistryName>, store: Arc<dyn EventStore>) -> Self {
        self.stores.insert(registry.into(), store);
        self
    }

    /// Store backing `registry`.
    pub fn store(&self, registry: &RegistryName) -> Result<&Arc<dyn EventStore>, LoaderError> {
        self.stores
            .get(registry)
            .ok_or_else(|| LoaderError::UnknownRegistry(registry.clone()))
    }
}

#[async_trait]
impl ModelLoader for FederatedModelLoader {
    async fn get(&self, id: &FederatedStreamId) -> Result<(Option<GranularCertificate>, usize), LoaderError> {
        let transactions = self.store(&id.registry)?.get_events(&id.stream_id).await?;
        let model = project_transactions(&transactions).map_err(|source| LoaderError::Corrupt {
            stream: id.clone(),
            source,
        })?;
        debug!(stream = %id, events = transactions.len(), found = model.is_some(), "model loaded");
        Ok((model, transactions.len()))
    }
}

#[async_trait]
impl RemoteModelLoader for FederatedModelLoader {
    async fn get_model(&self, id: &FederatedStreamId) -> Result<Option<GranularCertificate>, LoaderError> {
        Ok(self.get(id).await?.0)
    }
}

/// Bounds every remote fetch of an inner loader by a deadline.
pub struct TimeoutModelLoader<L> {
    inner: L,
    timeout: Duration,
}

impl<L> TimeoutModelLoader<L> {
    /// Wraps `inner` with `timeout`.
    pub fn new(inner: L, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl<L: RemoteModelLoader> RemoteModelLoader for TimeoutModelLoader<L> {
    async fn get_model(&self, id: &FederatedStreamId) -> Result<Option<GranularCertificate>, LoaderError> {
        match tokio::time::timeout(self.timeout, self.inner.get_model(id)).await {
            Ok(result) => result,
            Err(_) => Err(LoaderError::Timeout(self.timeout)),
        }
    }
}
