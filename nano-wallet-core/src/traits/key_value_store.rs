//! Persisted key/value state abstract Trait

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::CoreResult;

/// Keys the core reads and writes
pub mod keys {
    /// Last custom node address
    pub const ADDRESS: &str = "address";
    /// Last network index
    pub const NETWORK: &str = "network";
    /// Developer flag: submit the pre-filled passphrase automatically
    pub const AUTOLOGIN: &str = "autologin";
    /// Developer passphrase used by the pre-fill
    pub const LOGIN_KEY: &str = "loginKey";
}

/// Key/value store Trait
///
/// Platform implementation:
/// - App: `JsonFileStore` (JSON file in the config directory)
/// - Tests and ephemeral sessions: `InMemoryKeyValueStore`
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    ///
    /// # Returns
    /// * `Ok(Some(value))` - the key exists
    /// * `Ok(None)` - the key is absent
    async fn get(&self, key: &str) -> CoreResult<Option<String>>;

    /// Write a value
    async fn set(&self, key: &str, value: &str) -> CoreResult<()>;
}

/// In-memory key/value store
#[derive(Clone, Default)]
pub struct InMemoryKeyValueStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
