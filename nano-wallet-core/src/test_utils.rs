//! Test helper module
//!
//! Mock collaborators and factory methods for service tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::config::{BuildProfile, LoginConfig};
use crate::error::{CoreError, CoreResult};
use crate::i18n::Localizer;
use crate::services::{LoginService, ServiceContext};
use crate::traits::{
    AccountKeys, InMemoryKeyValueStore, KeyValueStore, PeerClient, SavedAccountRepository,
};
use crate::types::{
    Account, ActivationRequest, ActiveSession, HttpMethod, SavedAccount, SavedAccounts,
    SessionSnapshot,
};

pub const GENESIS_PASSPHRASE: &str =
    "wagon stock borrow episode laundry kitten salute link globe zero feed marble";
pub const GENESIS_ADDRESS: &str = "16313739661670634666L";
pub const GENESIS_PUBLIC_KEY: &str =
    "c094ebee7ec0c50ebee32918655e089f6e1a604b83bcaa760293c61e0f18ab6f";
pub const SECOND_PASSPHRASE: &str =
    "forest around decrease farm vanish permit hotel clay senior matter endorse domain";
pub const SECOND_ADDRESS: &str = "1155682438012955434L";

// ===== MockAccountKeys =====

/// Knows a fixed set of passphrases; everything else is invalid
pub struct MockAccountKeys {
    known: HashMap<&'static str, &'static str>,
}

impl MockAccountKeys {
    pub fn new() -> Self {
        Self {
            known: HashMap::from([
                (GENESIS_PASSPHRASE, GENESIS_ADDRESS),
                (SECOND_PASSPHRASE, SECOND_ADDRESS),
            ]),
        }
    }
}

impl AccountKeys for MockAccountKeys {
    fn address_from_passphrase(&self, passphrase: &str) -> String {
        self.known
            .get(passphrase)
            .map_or_else(|| "0L".to_string(), |a| (*a).to_string())
    }

    fn is_valid_passphrase(&self, passphrase: &str) -> bool {
        self.known.contains_key(passphrase)
    }
}

// ===== MockPeerClient =====

type Responder = Box<dyn Fn(HttpMethod, &str, &Value) -> CoreResult<Value> + Send + Sync>;

pub struct MockPeerClient {
    account: RwLock<Account>,
    /// If Some, activate returns this error
    activation_error: RwLock<Option<String>>,
    activations: RwLock<Vec<ActivationRequest>>,
    responder: RwLock<Responder>,
    requests: RwLock<Vec<(HttpMethod, String, Value)>>,
}

impl MockPeerClient {
    pub fn new() -> Self {
        let responder: Responder = Box::new(|_, _, _| Ok(json!({ "success": true })));
        Self {
            account: RwLock::new(test_account()),
            activation_error: RwLock::new(None),
            activations: RwLock::new(Vec::new()),
            responder: RwLock::new(responder),
            requests: RwLock::new(Vec::new()),
        }
    }

    pub async fn set_account(&self, account: Account) {
        *self.account.write().await = account;
    }

    pub async fn set_activation_error(&self, err: Option<String>) {
        *self.activation_error.write().await = err;
    }

    pub async fn set_responder<F>(&self, responder: F)
    where
        F: Fn(HttpMethod, &str, &Value) -> CoreResult<Value> + Send + Sync + 'static,
    {
        *self.responder.write().await = Box::new(responder);
    }

    pub async fn activations(&self) -> Vec<ActivationRequest> {
        self.activations.read().await.clone()
    }

    pub async fn requests(&self) -> Vec<(HttpMethod, String, Value)> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl PeerClient for MockPeerClient {
    async fn activate(&self, request: &ActivationRequest) -> CoreResult<ActiveSession> {
        self.activations.write().await.push(request.clone());
        if let Some(ref msg) = *self.activation_error.read().await {
            return Err(CoreError::ActivationFailed(msg.clone()));
        }
        let account = Account {
            passphrase: request.passphrase.clone(),
            ..self.account.read().await.clone()
        };
        Ok(ActiveSession {
            account,
            network: request.network.clone(),
        })
    }

    async fn request_to_active_peer(
        &self,
        method: HttpMethod,
        path: &str,
        params: Value,
    ) -> CoreResult<Value> {
        let result = {
            let responder = self.responder.read().await;
            (*responder)(method, path, &params)
        };
        self.requests
            .write()
            .await
            .push((method, path.to_string(), params));
        result
    }
}

// ===== MockSavedAccountRepository =====

pub struct MockSavedAccountRepository {
    saved: RwLock<SavedAccounts>,
}

impl MockSavedAccountRepository {
    pub fn new() -> Self {
        Self {
            saved: RwLock::new(SavedAccounts::default()),
        }
    }
}

#[async_trait]
impl SavedAccountRepository for MockSavedAccountRepository {
    async fn load(&self) -> CoreResult<SavedAccounts> {
        Ok(self.saved.read().await.clone())
    }

    async fn save_active(&self, account: &SavedAccount) -> CoreResult<()> {
        self.saved.write().await.last_active = Some(account.clone());
        Ok(())
    }
}

// ===== UnreadableKeyValueStore =====

/// Every read and write fails, like a store over a corrupt file
pub struct UnreadableKeyValueStore;

#[async_trait]
impl KeyValueStore for UnreadableKeyValueStore {
    async fn get(&self, _key: &str) -> CoreResult<Option<String>> {
        Err(CoreError::SerializationError("expected value at line 1".into()))
    }

    async fn set(&self, _key: &str, _value: &str) -> CoreResult<()> {
        Err(CoreError::StorageError("store is unreadable".into()))
    }
}

// ===== Factory methods =====

/// Create a `ServiceContext` for testing
pub fn create_test_context() -> (
    Arc<ServiceContext>,
    Arc<MockPeerClient>,
    Arc<InMemoryKeyValueStore>,
    Arc<MockSavedAccountRepository>,
) {
    let peer = Arc::new(MockPeerClient::new());
    let store = Arc::new(InMemoryKeyValueStore::new());
    let saved = Arc::new(MockSavedAccountRepository::new());

    let ctx = Arc::new(ServiceContext::new(
        peer.clone(),
        store.clone(),
        saved.clone(),
        Arc::new(MockAccountKeys::new()),
        Arc::new(Localizer::default()),
    ));

    (ctx, peer, store, saved)
}

/// Create a `LoginService` for testing
pub fn create_test_login_service(
    profile: BuildProfile,
) -> (
    Arc<LoginService>,
    Arc<MockPeerClient>,
    Arc<InMemoryKeyValueStore>,
    Arc<MockSavedAccountRepository>,
) {
    let (ctx, peer, store, saved) = create_test_context();
    let config = LoginConfig::default().with_profile(profile);
    (Arc::new(LoginService::new(ctx, config)), peer, store, saved)
}

/// Create a `LoginService` over an unusable key/value store
pub fn create_unreadable_login_service(
    profile: BuildProfile,
) -> (Arc<LoginService>, Arc<MockPeerClient>) {
    let peer = Arc::new(MockPeerClient::new());
    let ctx = Arc::new(ServiceContext::new(
        peer.clone(),
        Arc::new(UnreadableKeyValueStore),
        Arc::new(MockSavedAccountRepository::new()),
        Arc::new(MockAccountKeys::new()),
        Arc::new(Localizer::default()),
    ));
    let config = LoginConfig::default().with_profile(profile);
    (Arc::new(LoginService::new(ctx, config)), peer)
}

/// What the session store holds right after a logout
pub fn logged_out_snapshot() -> SessionSnapshot {
    let account = Account {
        after_logout: true,
        ..Account::default()
    };
    SessionSnapshot::from_account(&account, None)
}

/// Unlocked genesis account with a large balance
pub fn test_account() -> Account {
    Account {
        address: GENESIS_ADDRESS.to_string(),
        public_key: GENESIS_PUBLIC_KEY.to_string(),
        is_delegate: false,
        balance: 9_985_000_000_000_000,
        second_signature: false,
        passphrase: Some(GENESIS_PASSPHRASE.to_string()),
        after_logout: false,
    }
}

/// `GET transactions` answer with `rows` identical transfers
pub fn transactions_body(rows: usize, count: u64) -> Value {
    let row = json!({
        "id": "1",
        "senderId": "sample_address",
        "recipientId": "some_address",
        "amount": "100000000",
        "fee": "10000000",
        "timestamp": 0,
        "confirmations": 1,
        "type": 0,
    });
    json!({
        "transactions": vec![row; rows],
        "count": count,
    })
}
