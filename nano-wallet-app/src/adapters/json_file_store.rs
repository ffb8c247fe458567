//! JSON file store
//!
//! Keeps the persisted key/value entries and the saved-accounts cache in one
//! JSON file. Implements the core's `KeyValueStore` and
//! `SavedAccountRepository` traits.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use nano_wallet_core::traits::{KeyValueStore, SavedAccountRepository};
use nano_wallet_core::types::{SavedAccount, SavedAccounts};
use nano_wallet_core::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;

const APP_DIR: &str = "nano-wallet";
const STATE_FILE: &str = "state.json";

/// On-disk layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredState {
    #[serde(default)]
    entries: BTreeMap<String, String>,
    #[serde(default)]
    saved_accounts: SavedAccounts,
}

/// JSON file backed store
pub struct JsonFileStore {
    path: PathBuf,
    /// Loaded lazily on first access
    cache: Mutex<Option<StoredState>>,
}

impl JsonFileStore {
    /// Store at an explicit file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    /// Store in the platform config directory (`<config>/nano-wallet/state.json`)
    pub fn in_config_dir() -> Self {
        let dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);
        Self::new(dir.join(STATE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_from_file(&self) -> CoreResult<StoredState> {
        if !self.path.exists() {
            return Ok(StoredState::default());
        }
        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| CoreError::StorageError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| CoreError::SerializationError(e.to_string()))
    }

    async fn save_to_file(&self, state: &StoredState) -> CoreResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| CoreError::StorageError(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(state)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;
        fs::write(&self.path, content)
            .await
            .map_err(|e| CoreError::StorageError(e.to_string()))
    }

    async fn read<T>(&self, f: impl FnOnce(&StoredState) -> T) -> CoreResult<T> {
        let mut cache = self.cache.lock().await;
        let state = match cache.take() {
            Some(state) => state,
            None => self.load_from_file().await?,
        };
        let value = f(&state);
        *cache = Some(state);
        Ok(value)
    }

    /// Apply `f` and write the result through to the file
    ///
    /// An unparsable file is replaced by a fresh state.
    async fn update(&self, f: impl FnOnce(&mut StoredState)) -> CoreResult<()> {
        let mut cache = self.cache.lock().await;
        let mut state = match cache.take() {
            Some(state) => state,
            None => match self.load_from_file().await {
                Ok(state) => state,
                Err(CoreError::SerializationError(e)) => {
                    log::warn!("Replacing unreadable {}: {e}", self.path.display());
                    StoredState::default()
                }
                Err(e) => return Err(e),
            },
        };
        f(&mut state);
        let result = self.save_to_file(&state).await;
        *cache = Some(state);
        if let Err(ref e) = result {
            log::error!("Failed to write {}: {e}", self.path.display());
        }
        result
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> CoreResult<Option<String>> {
        self.read(|s| s.entries.get(key).cloned()).await
    }

    async fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.update(|s| {
            s.entries.insert(key.to_string(), value.to_string());
        })
        .await
    }
}

#[async_trait]
impl SavedAccountRepository for JsonFileStore {
    async fn load(&self) -> CoreResult<SavedAccounts> {
        self.read(|s| s.saved_accounts.clone()).await
    }

    async fn save_active(&self, account: &SavedAccount) -> CoreResult<()> {
        self.update(|s| s.saved_accounts.last_active = Some(account.clone()))
            .await
    }
}
