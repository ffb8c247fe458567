//! Platform-agnostic application bootstrap for Nano Wallet.
//!
//! Provides `AppState` (service container) and `AppStateBuilder` (adapter
//! injection). Concrete adapters live in [`adapters`].

pub mod adapters;

use std::sync::Arc;

use nano_wallet_core::error::{CoreError, CoreResult};
use nano_wallet_core::i18n::{Language, Localizer};
use nano_wallet_core::services::{LoginService, SendFlow, ServiceContext, TransactionService};
use nano_wallet_core::traits::{AccountKeys, KeyValueStore, PeerClient, SavedAccountRepository};
use nano_wallet_core::types::Account;
use nano_wallet_core::LoginConfig;

use crate::adapters::{HttpPeerClient, JsonFileStore};

/// Platform-agnostic application state.
///
/// Holds all services and the `ServiceContext`. Every frontend constructs this
/// once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Service context (holds all collaborators)
    pub ctx: Arc<ServiceContext>,
    /// Login screen service
    pub login_service: Arc<LoginService>,
    /// Transaction list service
    pub transaction_service: TransactionService,
    /// Configuration the state was built with
    pub config: LoginConfig,
}

impl AppState {
    /// Start a send flow for `account`
    pub fn send_flow(&self, account: Account) -> SendFlow {
        SendFlow::new(Arc::clone(&self.ctx), account)
    }

    /// Switch the UI language
    pub fn set_language(&self, language: Language) {
        self.ctx.localizer().set_language(language);
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `key_value_store`: persisted login entries
/// - `saved_account_repository`: remembered account
/// - `account_keys`: passphrase to address derivation
///
/// # Optional
/// - `peer_client`: defaults to `HttpPeerClient`
/// - `config`: defaults to `LoginConfig::default()`
/// - `localizer`: defaults to the configured language
pub struct AppStateBuilder {
    peer_client: Option<Arc<dyn PeerClient>>,
    key_value_store: Option<Arc<dyn KeyValueStore>>,
    saved_account_repository: Option<Arc<dyn SavedAccountRepository>>,
    account_keys: Option<Arc<dyn AccountKeys>>,
    localizer: Option<Arc<Localizer>>,
    config: LoginConfig,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            peer_client: None,
            key_value_store: None,
            saved_account_repository: None,
            account_keys: None,
            localizer: None,
            config: LoginConfig::default(),
        }
    }

    #[must_use]
    pub fn peer_client(mut self, client: Arc<dyn PeerClient>) -> Self {
        self.peer_client = Some(client);
        self
    }

    #[must_use]
    pub fn key_value_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.key_value_store = Some(store);
        self
    }

    #[must_use]
    pub fn saved_account_repository(mut self, repo: Arc<dyn SavedAccountRepository>) -> Self {
        self.saved_account_repository = Some(repo);
        self
    }

    /// Use one JSON file for both persisted entries and saved accounts
    #[must_use]
    pub fn json_file_store(self, store: Arc<JsonFileStore>) -> Self {
        self.key_value_store(store.clone())
            .saved_account_repository(store)
    }

    #[must_use]
    pub fn account_keys(mut self, keys: Arc<dyn AccountKeys>) -> Self {
        self.account_keys = Some(keys);
        self
    }

    #[must_use]
    pub fn localizer(mut self, localizer: Arc<Localizer>) -> Self {
        self.localizer = Some(localizer);
        self
    }

    #[must_use]
    pub fn config(mut self, config: LoginConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing.
    pub fn build(self) -> CoreResult<AppState> {
        let key_value_store = self.key_value_store.ok_or_else(|| {
            CoreError::ValidationError("key_value_store is required".to_string())
        })?;
        let saved_account_repository = self.saved_account_repository.ok_or_else(|| {
            CoreError::ValidationError("saved_account_repository is required".to_string())
        })?;
        let account_keys = self
            .account_keys
            .ok_or_else(|| CoreError::ValidationError("account_keys is required".to_string()))?;

        let config = self.config;
        let peer_client = self
            .peer_client
            .unwrap_or_else(|| Arc::new(HttpPeerClient::new(config.peer_max_retries)));
        let localizer = self.localizer.unwrap_or_else(|| {
            let language = Language::from_code(&config.language).unwrap_or_else(|| {
                log::warn!("Unknown language '{}', using English", config.language);
                Language::default()
            });
            Arc::new(Localizer::new(language))
        });

        let ctx = Arc::new(ServiceContext::new(
            peer_client,
            key_value_store,
            saved_account_repository,
            account_keys,
            localizer,
        ));

        let login_service = Arc::new(LoginService::new(Arc::clone(&ctx), config.clone()));
        let transaction_service = TransactionService::new(Arc::clone(&ctx));
        log::info!("App state ready ({:?} profile)", config.profile);

        Ok(AppState {
            ctx,
            login_service,
            transaction_service,
            config,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
