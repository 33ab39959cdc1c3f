//! Network configuration and the issuer key registry.
//!
//! The registry is an immutable snapshot. [`IssuerRegistryHandle`] swaps in
//! a new snapshot atomically on reload; verifications already running keep
//! the `Arc` they started with.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ed25519_dalek::VerifyingKey;
use granular_canonical::{GridArea, RegistryName};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::ConfigError;
use crate::keys::PublicKeyBytes;

/// Where a registry's event streams live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryInfo {
    /// Endpoint of the registry's verifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Directory holding the registry's per-stream journals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<PathBuf>,
}

/// One configured issuer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerKeyInfo {
    /// Base64 of the raw 32-byte Ed25519 key.
    pub public_key: String,
}

/// Issuer keys for one grid area.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaInfo {
    /// Currently valid issuer keys, in preference order.
    #[serde(default)]
    pub issuer_keys: Vec<IssuerKeyInfo>,
}

/// Network configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Known registries by name.
    #[serde(default)]
    pub registries: BTreeMap<RegistryName, RegistryInfo>,
    /// Grid areas and their issuers.
    #[serde(default)]
    pub areas: BTreeMap<GridArea, AreaInfo>,
}

impl NetworkConfig {
    /// Parses a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }
}

/// Issuer public keys per grid area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuerKeyRegistry {
    areas: HashMap<GridArea, Vec<VerifyingKey>>,
}

impl IssuerKeyRegistry {
    /// Empty registry; every area lacks an issuer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry from configuration. Malformed keys are errors.
    pub fn from_config(config: &NetworkConfig) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for (area, info) in &config.areas {
            let mut keys = Vec::with_capacity(info.issuer_keys.len());
            for key in &info.issuer_keys {
                let invalid = |reason: &str| ConfigError::InvalidIssuerKey {
                    area: area.clone(),
                    reason: reason.to_string(),
                };
                let bytes = granular_canonical::bytes::decode(&key.public_key)
                    .ok_or_else(|| invalid("not base64"))?;
                let key = PublicKeyBytes::new(bytes)
                    .to_verifying_key()
                    .ok_or_else(|| invalid("not a valid Ed25519 public key"))?;
                keys.push(key);
            }
            registry.areas.insert(area.clone(), keys);
        }
        Ok(registry)
    }

    /// Returns a copy with `keys` registered for `area`.
    pub fn with_area(mut self, area: GridArea, keys: impl IntoIterator<Item = VerifyingKey>) -> Self {
        self.areas.entry(area).or_default().extend(keys);
        self
    }

    /// Issuer keys for `area`, empty if none are registered.
    pub fn issuer_keys(&self, area: &GridArea) -> &[VerifyingKey] {
        self.areas.get(area).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Shared, hot-swappable handle to the current registry snapshot.
#[derive(Debug, Clone, Default)]
pub struct IssuerRegistryHandle {
    current: Arc<RwLock<Arc<IssuerKeyRegistry>>>,
}

impl IssuerRegistryHandle {
    /// Wraps an initial snapshot.
    pub fn new(registry: IssuerKeyRegistry) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(registry))),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<IssuerKeyRegistry> {
        self.current.read().clone()
    }

    /// Atomically replaces the snapshot.
    pub fn replace(&self, registry: IssuerKeyRegistry) {
        *self.current.write() = Arc::new(registry);
    }

    /// Reloads from a configuration file. The old snapshot stays on error.
    pub fn reload_from_path(&self, path: &Path) -> Result<(), ConfigError> {
        let registry = IssuerKeyRegistry::from_config(&NetworkConfig::load(path)?)?;
        info!(path = %path.display(), areas = registry.areas.len(), "issuer registry reloaded");
        self.replace(registry);
        Ok(())
    }
}
