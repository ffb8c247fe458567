//! Login service
//!
//! Owns the mounted login screen (form controller plus session resolver) and
//! performs the IO the resolver asks for: peer activation, persisted entries
//! and the saved-accounts cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::LoginConfig;
use crate::error::{CoreError, CoreResult};
use crate::services::{
    log_failure, LoginFormController, MountDecision, ReferrerRouter, ServiceContext,
    SessionResolver, SubmitDecision,
};
use crate::traits::keys;
use crate::types::{
    ActivationRequest, FormState, LoginField, NetworkCode, NetworkOption, SavedAccount,
    SavedAccounts, SessionSnapshot, SessionState,
};

/// Result of a mount or a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub state: SessionState,
    /// Route to navigate to, when the redirect fired
    pub destination: Option<String>,
}

/// State of one mounted login screen
struct LoginScreen {
    generation: u64,
    search: String,
    controller: LoginFormController,
    resolver: SessionResolver,
    /// Last session reported by the session store
    previous: SessionSnapshot,
    destination: Option<String>,
}

/// Values restored into the form on mount
struct RememberedLogin {
    network: NetworkCode,
    address: String,
    passphrase: Option<String>,
}

/// Login service
pub struct LoginService {
    ctx: Arc<ServiceContext>,
    config: LoginConfig,
    screen: Mutex<Option<LoginScreen>>,
    generation: AtomicU64,
    pending_submit: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl LoginService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, config: LoginConfig) -> Self {
        Self {
            ctx,
            config,
            screen: Mutex::new(None),
            generation: AtomicU64::new(0),
            pending_submit: std::sync::Mutex::new(None),
        }
    }

    // ===== Lifecycle =====

    /// Mount the login screen
    ///
    /// # Arguments
    /// * `search` - query string of the login route (`?referrer=...`)
    /// * `current` - what the session store holds right now; its
    ///   `after_logout` marks a screen reached by logging out
    ///
    /// A failed auto-login is not an error: the screen falls back to manual
    /// login. Unreadable persisted entries fall back to their defaults.
    pub async fn mount(
        self: &Arc<Self>,
        search: &str,
        current: SessionSnapshot,
    ) -> CoreResult<LoginOutcome> {
        let after_logout = current.after_logout;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let saved = self.load_saved_accounts().await;

        let mut screen = LoginScreen {
            generation,
            search: search.to_string(),
            controller: LoginFormController::new(
                self.ctx.credential_validator().clone(),
                self.ctx.network_catalog().clone(),
            ),
            resolver: SessionResolver::new(self.config.profile),
            previous: current,
            destination: None,
        };

        match screen
            .resolver
            .resolve_mount(&saved, after_logout, self.ctx.network_catalog())
        {
            MountDecision::AutoLogin(request) => {
                // The form keeps its defaults here, so the redirect persists
                // the default network rather than the saved account's one.
                *self.screen.lock().await = Some(screen);
                match self.activate(generation, request).await {
                    Ok(outcome) => Ok(outcome),
                    Err(_) => Ok(LoginOutcome {
                        state: SessionState::PromptingManualLogin,
                        destination: None,
                    }),
                }
            }
            MountDecision::Prompt { prefill_passphrase } => {
                let remembered = self.remembered_login(prefill_passphrase).await;
                screen.controller.prefill(
                    remembered.network,
                    &remembered.address,
                    remembered.passphrase.as_deref(),
                );

                let autologin = self
                    .ctx
                    .read_flag(keys::AUTOLOGIN)
                    .await
                    .unwrap_or_else(|e| {
                        log_failure("Reading autologin flag", &e);
                        false
                    });
                let auto_submit = remembered
                    .passphrase
                    .filter(|p| screen.resolver.should_auto_submit(autologin, after_logout, p));
                let state = screen.resolver.state();
                *self.screen.lock().await = Some(screen);

                if let Some(passphrase) = auto_submit {
                    self.schedule_auto_submit(generation, passphrase);
                }
                Ok(LoginOutcome {
                    state,
                    destination: None,
                })
            }
        }
    }

    /// Tear the screen down; a pending auto-submit becomes a no-op
    pub async fn unmount(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.screen.lock().await = None;
    }

    /// Report a change of the session store
    ///
    /// Returns the destination when the redirect fires.
    pub async fn session_updated(&self, current: SessionSnapshot) -> Option<String> {
        let mut guard = self.screen.lock().await;
        let screen = guard.as_mut()?;
        self.apply_snapshot(screen, current).await
    }

    // ===== Form =====

    /// Apply an edit of one form field
    pub async fn change_field(
        &self,
        field: LoginField,
        value: &str,
        external_error: Option<&str>,
    ) -> CoreResult<FormState> {
        let mut guard = self.screen.lock().await;
        let screen = guard.as_mut().ok_or_else(not_mounted)?;
        screen.controller.on_field_change(field, value, external_error)?;
        Ok(screen.controller.state().clone())
    }

    /// Apply a passphrase edit, computing its error message
    pub async fn change_passphrase(&self, value: &str) -> CoreResult<FormState> {
        let error = self.ctx.credential_validator().passphrase_error(value);
        self.change_field(LoginField::Passphrase, value, error.as_deref())
            .await
    }

    pub async fn form_state(&self) -> Option<FormState> {
        self.screen
            .lock()
            .await
            .as_ref()
            .map(|s| s.controller.state().clone())
    }

    pub async fn can_submit(&self) -> bool {
        self.screen
            .lock()
            .await
            .as_ref()
            .is_some_and(|s| s.controller.can_submit())
    }

    pub async fn state(&self) -> SessionState {
        self.screen
            .lock()
            .await
            .as_ref()
            .map_or(SessionState::NoSession, |s| s.resolver.state())
    }

    /// Destination of the last redirect of the mounted screen
    pub async fn destination(&self) -> Option<String> {
        self.screen
            .lock()
            .await
            .as_ref()
            .and_then(|s| s.destination.clone())
    }

    pub fn network_options(&self) -> Vec<NetworkOption> {
        self.ctx.network_catalog().list()
    }

    pub async fn show_network_options(&self) -> bool {
        self.screen
            .lock()
            .await
            .as_ref()
            .is_some_and(|s| ReferrerRouter::show_network_options(&s.search))
    }

    // ===== Submission =====

    /// Submit the form
    ///
    /// Fails with `ValidationError` when the form is not submittable and
    /// with the activation error when the peer refuses the login.
    pub async fn submit(&self) -> CoreResult<LoginOutcome> {
        let (generation, passphrase) = {
            let guard = self.screen.lock().await;
            let screen = guard.as_ref().ok_or_else(not_mounted)?;
            let submission = screen.controller.submission()?;
            (screen.generation, submission.passphrase)
        };
        self.submit_passphrase(generation, &passphrase).await
    }

    /// Handle of the scheduled development auto-submit, if any
    pub fn take_pending_submit(&self) -> Option<JoinHandle<()>> {
        self.pending_submit
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    async fn submit_passphrase(&self, generation: u64, passphrase: &str) -> CoreResult<LoginOutcome> {
        let mut guard = self.screen.lock().await;
        let screen = guard
            .as_mut()
            .filter(|s| s.generation == generation)
            .ok_or_else(not_mounted)?;

        let submission = screen.controller.submission_with(passphrase);
        let derived_address = self.ctx.account_keys().address_from_passphrase(passphrase);
        match screen
            .resolver
            .resolve_submit(submission, &derived_address, &screen.previous)
        {
            SubmitDecision::Reconnect => {
                if let (Some(address), Some(network)) =
                    (&screen.previous.address, &screen.previous.network)
                {
                    screen.resolver.record_redirect(address, network);
                }
                let is_delegate = screen.previous.is_delegate;
                let destination = self.redirect(screen, is_delegate).await;
                self.save_active_account(&screen.previous).await;
                Ok(LoginOutcome {
                    state: screen.resolver.state(),
                    destination: Some(destination),
                })
            }
            SubmitDecision::Activate(request) => {
                drop(guard);
                self.activate(generation, request).await
            }
        }
    }

    /// Activate a peer without holding the screen lock
    async fn activate(&self, generation: u64, request: ActivationRequest) -> CoreResult<LoginOutcome> {
        log::info!(
            "Activating peer {} ({})",
            request.network.name,
            request.network.address.as_deref().unwrap_or("-")
        );
        let result = self.ctx.peer_client().activate(&request).await;

        let mut guard = self.screen.lock().await;
        let screen = guard.as_mut().filter(|s| s.generation == generation);
        match result {
            Ok(session) => {
                let Some(screen) = screen else {
                    log::debug!("Login screen torn down during activation");
                    return Ok(LoginOutcome {
                        state: SessionState::SessionActive,
                        destination: None,
                    });
                };
                screen.resolver.activation_succeeded();
                let destination = self
                    .apply_snapshot(screen, SessionSnapshot::from_session(&session))
                    .await;
                Ok(LoginOutcome {
                    state: screen.resolver.state(),
                    destination,
                })
            }
            Err(e) => {
                log_failure("Peer activation", &e);
                if let Some(screen) = screen {
                    screen.resolver.activation_failed();
                }
                Err(e)
            }
        }
    }

    fn schedule_auto_submit(self: &Arc<Self>, generation: u64, passphrase: String) {
        let weak = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            tokio::task::yield_now().await;
            let Some(service) = weak.upgrade() else {
                return;
            };
            if service.generation.load(Ordering::SeqCst) != generation {
                log::debug!("Login screen changed, skipping automatic login");
                return;
            }
            log::info!("Submitting pre-filled development login");
            if let Err(e) = service.submit_passphrase(generation, &passphrase).await {
                log_failure("Automatic login", &e);
            }
        });
        *self
            .pending_submit
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }

    // ===== Helpers =====

    async fn apply_snapshot(
        &self,
        screen: &mut LoginScreen,
        current: SessionSnapshot,
    ) -> Option<String> {
        let fire = screen.resolver.session_changed(&screen.previous, &current);
        let is_delegate = current.is_delegate;
        screen.previous = current;
        if !fire {
            return None;
        }
        Some(self.redirect(screen, is_delegate).await)
    }

    /// Compute the destination and remember the chosen network
    async fn redirect(&self, screen: &mut LoginScreen, is_delegate: bool) -> String {
        let destination = ReferrerRouter::destination_for(&screen.search, is_delegate);
        let form = screen.controller.state();
        let store = self.ctx.key_value_store();

        if !form.address.is_empty() {
            if let Err(e) = store.set(keys::ADDRESS, &form.address).await {
                log_failure("Persisting node address", &e);
            }
        }
        let network = form.selected_network.index().to_string();
        if let Err(e) = store.set(keys::NETWORK, &network).await {
            log_failure("Persisting network", &e);
        }

        log::info!("Login redirect to {destination}");
        screen.destination = Some(destination.clone());
        destination
    }

    async fn save_active_account(&self, snapshot: &SessionSnapshot) {
        let (Some(public_key), Some(network)) = (&snapshot.public_key, &snapshot.network) else {
            log::warn!("Active session has no public key, not saving it");
            return;
        };
        let account = SavedAccount {
            public_key: public_key.clone(),
            network: network.code,
            peer_address: match network.code {
                NetworkCode::CustomNode => network.address.clone(),
                _ => None,
            },
        };
        if let Err(e) = self
            .ctx
            .saved_account_repository()
            .save_active(&account)
            .await
        {
            log_failure("Saving active account", &e);
        }
    }

    async fn load_saved_accounts(&self) -> SavedAccounts {
        match self.ctx.saved_account_repository().load().await {
            Ok(saved) => saved,
            Err(e) => {
                log_failure("Loading saved accounts", &e);
                SavedAccounts::default()
            }
        }
    }

    async fn remembered_login(&self, with_passphrase: bool) -> RememberedLogin {
        let network = match self.read_entry(keys::NETWORK).await {
            Some(raw) => NetworkCode::parse(&raw).unwrap_or_else(|e| {
                log::warn!("Ignoring persisted network: {e}");
                NetworkCode::default()
            }),
            None => NetworkCode::default(),
        };
        let address = self.read_entry(keys::ADDRESS).await.unwrap_or_default();
        let passphrase = if with_passphrase {
            self.read_entry(keys::LOGIN_KEY).await
        } else {
            None
        };
        RememberedLogin {
            network,
            address,
            passphrase,
        }
    }

    /// Persisted entry; a failed read counts as absent
    async fn read_entry(&self, key: &str) -> Option<String> {
        match self.ctx.key_value_store().get(key).await {
            Ok(value) => value,
            Err(e) => {
                log_failure(&format!("Reading persisted '{key}'"), &e);
                None
            }
        }
    }
}

fn not_mounted() -> CoreError {
    CoreError::InvalidState("Login screen is not mounted".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildProfile;
    use crate::services::DEFAULT_ROUTE;
    use crate::test_utils::{
        create_test_login_service, create_unreadable_login_service, logged_out_snapshot,
        test_account, GENESIS_ADDRESS, GENESIS_PASSPHRASE,
    };
    use crate::traits::{KeyValueStore, SavedAccountRepository};
    use crate::types::Network;

    fn mainnet() -> Network {
        Network {
            code: NetworkCode::Mainnet,
            name: "Mainnet".into(),
            address: Some("https://hub21.lisk.io".into()),
        }
    }

    #[tokio::test]
    async fn manual_login_activates_and_redirects() {
        let (svc, peer, store, _) = create_test_login_service(BuildProfile::Production);
        peer.set_account(test_account()).await;

        let outcome = svc
            .mount("?referrer=%2Fmain%2Fvoting", SessionSnapshot::default())
            .await
            .unwrap();
        assert_eq!(outcome.state, SessionState::PromptingManualLogin);

        svc.change_passphrase(GENESIS_PASSPHRASE).await.unwrap();
        assert!(svc.can_submit().await);

        let outcome = svc.submit().await.unwrap();
        assert_eq!(outcome.state, SessionState::SessionActive);
        assert_eq!(outcome.destination.as_deref(), Some("/main/voting"));

        let activations = peer.activations().await;
        assert_eq!(activations.len(), 1);
        assert_eq!(activations[0].passphrase.as_deref(), Some(GENESIS_PASSPHRASE));
        assert_eq!(activations[0].network, mainnet());

        assert_eq!(store.get(keys::NETWORK).await.unwrap().as_deref(), Some("0"));
        assert_eq!(store.get(keys::ADDRESS).await.unwrap(), None);
    }

    #[tokio::test]
    async fn submit_of_invalid_form_sends_nothing() {
        let (svc, peer, _, _) = create_test_login_service(BuildProfile::Production);
        svc.mount("", SessionSnapshot::default()).await.unwrap();

        assert!(matches!(
            svc.submit().await,
            Err(CoreError::ValidationError(_))
        ));
        assert!(peer.activations().await.is_empty());
    }

    #[tokio::test]
    async fn failed_activation_keeps_prompting() {
        let (svc, peer, store, _) = create_test_login_service(BuildProfile::Production);
        peer.set_activation_error(Some("node offline".into())).await;
        svc.mount("", SessionSnapshot::default()).await.unwrap();
        svc.change_passphrase(GENESIS_PASSPHRASE).await.unwrap();

        assert!(svc.submit().await.is_err());
        assert_eq!(svc.state().await, SessionState::PromptingManualLogin);
        assert_eq!(svc.destination().await, None);
        assert_eq!(store.get(keys::NETWORK).await.unwrap(), None);
    }

    #[tokio::test]
    async fn saved_account_auto_logs_in() {
        let (svc, peer, _, saved) = create_test_login_service(BuildProfile::Production);
        peer.set_account(test_account()).await;
        saved
            .save_active(&SavedAccount {
                public_key: test_account().public_key,
                network: NetworkCode::Testnet,
                peer_address: None,
            })
            .await
            .unwrap();

        let outcome = svc
            .mount("", SessionSnapshot::default())
            .await
            .unwrap();
        assert_eq!(outcome.state, SessionState::SessionActive);
        assert_eq!(outcome.destination.as_deref(), Some(DEFAULT_ROUTE));

        let activations = peer.activations().await;
        assert_eq!(activations[0].public_key, Some(test_account().public_key));
        assert_eq!(activations[0].network.code, NetworkCode::Testnet);
    }

    #[tokio::test]
    async fn failed_auto_login_falls_back_to_prompt() {
        let (svc, peer, _, saved) = create_test_login_service(BuildProfile::Production);
        peer.set_activation_error(Some("unknown account".into())).await;
        saved
            .save_active(&SavedAccount {
                public_key: "pk".into(),
                network: NetworkCode::Mainnet,
                peer_address: None,
            })
            .await
            .unwrap();

        let outcome = svc
            .mount("", SessionSnapshot::default())
            .await
            .unwrap();
        assert_eq!(outcome.state, SessionState::PromptingManualLogin);
    }

    #[tokio::test]
    async fn logout_ignores_saved_account() {
        let (svc, peer, _, saved) = create_test_login_service(BuildProfile::Production);
        saved
            .save_active(&SavedAccount {
                public_key: "pk".into(),
                network: NetworkCode::Mainnet,
                peer_address: None,
            })
            .await
            .unwrap();

        let outcome = svc.mount("", logged_out_snapshot()).await.unwrap();
        assert_eq!(outcome.state, SessionState::PromptingManualLogin);
        assert!(peer.activations().await.is_empty());
    }

    #[tokio::test]
    async fn reconnect_skips_activation() {
        let (svc, peer, _, saved) = create_test_login_service(BuildProfile::Production);
        let current = SessionSnapshot {
            address: Some(GENESIS_ADDRESS.into()),
            public_key: Some("genesis-pk".into()),
            network: Some(mainnet()),
            is_delegate: true,
            after_logout: false,
        };
        svc.mount("?referrer=/main/forging", current)
            .await
            .unwrap();
        svc.change_passphrase(GENESIS_PASSPHRASE).await.unwrap();

        let outcome = svc.submit().await.unwrap();
        assert_eq!(outcome.destination.as_deref(), Some("/main/forging"));
        assert!(peer.activations().await.is_empty());

        let last = saved.load().await.unwrap().last_active.unwrap();
        assert_eq!(last.public_key, "genesis-pk");
        assert_eq!(last.network, NetworkCode::Mainnet);
    }

    #[tokio::test]
    async fn session_update_redirects_once() {
        let (svc, _, _, _) = create_test_login_service(BuildProfile::Production);
        svc.mount("", SessionSnapshot::default()).await.unwrap();

        let logged_in = SessionSnapshot {
            address: Some("123L".into()),
            public_key: None,
            network: Some(mainnet()),
            is_delegate: false,
            after_logout: false,
        };
        assert_eq!(
            svc.session_updated(logged_in.clone()).await.as_deref(),
            Some(DEFAULT_ROUTE)
        );
        assert_eq!(svc.session_updated(logged_in).await, None);
    }

    #[tokio::test]
    async fn remembered_network_is_restored_in_production() {
        let (svc, _, store, _) = create_test_login_service(BuildProfile::Production);
        store.set(keys::NETWORK, "2").await.unwrap();
        store
            .set(keys::ADDRESS, "http://localhost:4000")
            .await
            .unwrap();
        store
            .set(keys::LOGIN_KEY, GENESIS_PASSPHRASE)
            .await
            .unwrap();

        svc.mount("?showNetwork=true", SessionSnapshot::default())
            .await
            .unwrap();
        let form = svc.form_state().await.unwrap();
        assert_eq!(form.selected_network, NetworkCode::CustomNode);
        assert_eq!(form.address, "http://localhost:4000");
        assert_eq!(form.passphrase, "");
        assert!(svc.show_network_options().await);
    }

    #[tokio::test]
    async fn dev_autologin_submits_once_on_next_tick() {
        let (svc, peer, store, _) = create_test_login_service(BuildProfile::Development);
        peer.set_account(test_account()).await;
        store
            .set(keys::LOGIN_KEY, GENESIS_PASSPHRASE)
            .await
            .unwrap();
        store.set(keys::AUTOLOGIN, "true").await.unwrap();

        svc.mount("", SessionSnapshot::default()).await.unwrap();
        assert_eq!(
            svc.form_state().await.unwrap().passphrase,
            GENESIS_PASSPHRASE
        );

        svc.take_pending_submit().unwrap().await.unwrap();
        assert_eq!(peer.activations().await.len(), 1);
        assert_eq!(svc.state().await, SessionState::SessionActive);
        assert_eq!(svc.destination().await.as_deref(), Some(DEFAULT_ROUTE));
    }

    #[tokio::test]
    async fn dev_autologin_is_dropped_after_unmount() {
        let (svc, peer, store, _) = create_test_login_service(BuildProfile::Development);
        store
            .set(keys::LOGIN_KEY, GENESIS_PASSPHRASE)
            .await
            .unwrap();
        store.set(keys::AUTOLOGIN, "1").await.unwrap();

        svc.mount("", SessionSnapshot::default()).await.unwrap();
        let pending = svc.take_pending_submit().unwrap();
        svc.unmount().await;
        pending.await.unwrap();

        assert!(peer.activations().await.is_empty());
    }

    #[tokio::test]
    async fn no_autologin_after_logout() {
        let (svc, _, store, _) = create_test_login_service(BuildProfile::Development);
        store
            .set(keys::LOGIN_KEY, GENESIS_PASSPHRASE)
            .await
            .unwrap();
        store.set(keys::AUTOLOGIN, "true").await.unwrap();

        svc.mount("", logged_out_snapshot()).await.unwrap();
        assert!(svc.take_pending_submit().is_none());
    }

    #[tokio::test]
    async fn saved_account_login_persists_default_network() {
        let (svc, peer, store, saved) = create_test_login_service(BuildProfile::Production);
        peer.set_account(test_account()).await;
        store.set(keys::NETWORK, "2").await.unwrap();
        saved
            .save_active(&SavedAccount {
                public_key: test_account().public_key,
                network: NetworkCode::CustomNode,
                peer_address: Some("http://localhost:4000".into()),
            })
            .await
            .unwrap();

        let outcome = svc.mount("", SessionSnapshot::default()).await.unwrap();
        assert_eq!(outcome.state, SessionState::SessionActive);
        assert_eq!(
            peer.activations().await[0].network.address.as_deref(),
            Some("http://localhost:4000")
        );
        assert_eq!(store.get(keys::NETWORK).await.unwrap().as_deref(), Some("0"));
    }

    #[tokio::test]
    async fn unreadable_store_still_mounts() {
        let (svc, peer) = create_unreadable_login_service(BuildProfile::Development);
        peer.set_account(test_account()).await;

        let outcome = svc.mount("", SessionSnapshot::default()).await.unwrap();
        assert_eq!(outcome.state, SessionState::PromptingManualLogin);
        let form = svc.form_state().await.unwrap();
        assert_eq!(form.selected_network, NetworkCode::Mainnet);
        assert_eq!(form.passphrase, "");
        assert!(svc.take_pending_submit().is_none());

        svc.change_passphrase(GENESIS_PASSPHRASE).await.unwrap();
        let outcome = svc.submit().await.unwrap();
        assert_eq!(outcome.destination.as_deref(), Some(DEFAULT_ROUTE));
    }

    #[tokio::test]
    async fn unmounted_screen_rejects_edits() {
        let (svc, _, _, _) = create_test_login_service(BuildProfile::Production);
        assert!(matches!(
            svc.change_field(LoginField::Address, "x", None).await,
            Err(CoreError::InvalidState(_))
        ));
        assert_eq!(svc.state().await, SessionState::NoSession);
    }
}
