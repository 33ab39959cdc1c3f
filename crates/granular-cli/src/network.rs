//! Wiring from the network configuration to loaders and the dispatcher.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use granular_canonical::RegistryName;
use granular_core::{
    FederatedModelLoader, IssuerKeyRegistry, IssuerRegistryHandle, LoaderError, NetworkConfig,
    TimeoutModelLoader, VerificationDispatcher,
};
use granular_journal::{JournalEventStore, ReadMode};
use std::collections::HashMap;
use tracing::debug;

pub struct Network {
    pub loader: Arc<FederatedModelLoader>,
    stores: HashMap<RegistryName, JournalEventStore>,
    issuers: IssuerRegistryHandle,
}

impl Network {
    /// Opens every registry journal named in the configuration.
    ///
    /// Relative journal paths resolve against the configuration file's directory.
    pub fn load(config_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let config = NetworkConfig::load(config_path)?;
        let issuers = IssuerRegistryHandle::new(IssuerKeyRegistry::from_config(&config)?);
        let base = config_path.parent().unwrap_or_else(|| Path::new("."));

        let mut loader = FederatedModelLoader::new();
        let mut stores = HashMap::new();
        for (name, info) in &config.registries {
            let Some(journal) = &info.journal else {
                debug!(registry = %name, "registry has no local journal");
                continue;
            };
            let store = JournalEventStore::open(base.join(journal), ReadMode::Strict)?;
            loader = loader.with_store(name.clone(), Arc::new(store.clone()));
            stores.insert(name.clone(), store);
        }

        Ok(Self {
            loader: Arc::new(loader),
            stores,
            issuers,
        })
    }

    pub fn dispatcher(&self, timeout: Duration) -> VerificationDispatcher {
        let remote = TimeoutModelLoader::new(self.loader.clone(), timeout);
        VerificationDispatcher::new(self.loader.clone(), Arc::new(remote), self.issuers.clone())
    }

    pub fn store(&self, registry: &RegistryName) -> Result<&JournalEventStore, LoaderError> {
        self.stores
            .get(registry)
            .ok_or_else(|| LoaderError::UnknownRegistry(registry.clone()))
    }
}
