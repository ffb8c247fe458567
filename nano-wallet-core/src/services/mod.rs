//! Business logic service layer

mod credential_validator;
mod login_controller;
mod login_service;
mod network_catalog;
mod referrer_router;
mod send_flow;
mod session_resolver;
mod transaction_service;

pub use credential_validator::{is_valid_node_url, CredentialValidator};
pub use login_controller::LoginFormController;
pub use login_service::{LoginOutcome, LoginService};
pub use network_catalog::NetworkCatalog;
pub use referrer_router::{parse_search_params, ReferrerRouter, DEFAULT_ROUTE, DELEGATE_ROUTE};
pub use send_flow::{
    parse_amount, SendFlow, SendForm, SendResult, SendStep, BEDDOWS_PER_LSK, FEE_BEDDOWS,
};
pub use session_resolver::{MountDecision, SessionResolver, SubmitDecision};
pub use transaction_service::{TransactionService, PAGE_SIZE};

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::i18n::Localizer;
use crate::traits::{AccountKeys, KeyValueStore, PeerClient, SavedAccountRepository};

/// Service context - holds all dependencies
///
/// The platform layer creates this context and injects its collaborators.
pub struct ServiceContext {
    peer_client: Arc<dyn PeerClient>,
    key_value_store: Arc<dyn KeyValueStore>,
    saved_account_repository: Arc<dyn SavedAccountRepository>,
    account_keys: Arc<dyn AccountKeys>,
    localizer: Arc<Localizer>,
    network_catalog: Arc<NetworkCatalog>,
    credential_validator: Arc<CredentialValidator>,
}

impl ServiceContext {
    /// Create the service context
    #[must_use]
    pub fn new(
        peer_client: Arc<dyn PeerClient>,
        key_value_store: Arc<dyn KeyValueStore>,
        saved_account_repository: Arc<dyn SavedAccountRepository>,
        account_keys: Arc<dyn AccountKeys>,
        localizer: Arc<Localizer>,
    ) -> Self {
        let network_catalog = NetworkCatalog::new(&localizer);
        let credential_validator = Arc::new(CredentialValidator::new(
            localizer.clone(),
            account_keys.clone(),
        ));
        Self {
            peer_client,
            key_value_store,
            saved_account_repository,
            account_keys,
            localizer,
            network_catalog,
            credential_validator,
        }
    }

    pub fn peer_client(&self) -> &Arc<dyn PeerClient> {
        &self.peer_client
    }

    pub fn key_value_store(&self) -> &Arc<dyn KeyValueStore> {
        &self.key_value_store
    }

    pub fn saved_account_repository(&self) -> &Arc<dyn SavedAccountRepository> {
        &self.saved_account_repository
    }

    pub fn account_keys(&self) -> &Arc<dyn AccountKeys> {
        &self.account_keys
    }

    pub fn localizer(&self) -> &Arc<Localizer> {
        &self.localizer
    }

    pub fn network_catalog(&self) -> &Arc<NetworkCatalog> {
        &self.network_catalog
    }

    pub fn credential_validator(&self) -> &Arc<CredentialValidator> {
        &self.credential_validator
    }

    /// Read a persisted flag; any non-empty value other than `false`/`0` is set
    pub(crate) async fn read_flag(&self, key: &str) -> CoreResult<bool> {
        Ok(self
            .key_value_store
            .get(key)
            .await?
            .is_some_and(|v| !v.is_empty() && v != "false" && v != "0"))
    }
}

/// Log a failed operation at the level its error deserves
pub(crate) fn log_failure(operation: &str, err: &CoreError) {
    if err.is_expected() {
        log::warn!("{operation} failed: {err}");
    } else {
        log::error!("{operation} failed: {err}");
    }
}
