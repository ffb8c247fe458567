//! Session resolution state machine
//!
//! Decides between resuming a saved session, pre-filling a development login
//! and waiting for a manual submission. Holds no IO; `LoginService` performs
//! the requests it asks for.

use crate::config::BuildProfile;
use crate::services::NetworkCatalog;
use crate::types::{
    ActivationRequest, LoginSubmission, Network, NetworkCode, SavedAccounts, SessionSnapshot,
    SessionState,
};

/// What to do when the login screen mounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountDecision {
    /// Resume the saved account
    AutoLogin(ActivationRequest),
    /// Show the form
    Prompt {
        /// The developer passphrase may be pre-filled
        prefill_passphrase: bool,
    },
}

/// What to do with a valid form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDecision {
    /// The passphrase opens the account already active on this network
    Reconnect,
    /// Activate a peer with the passphrase
    Activate(ActivationRequest),
}

/// Session resolver
#[derive(Debug)]
pub struct SessionResolver {
    profile: BuildProfile,
    state: SessionState,
    dev_prefill_done: bool,
    last_redirect: Option<(String, Network)>,
}

impl SessionResolver {
    #[must_use]
    pub fn new(profile: BuildProfile) -> Self {
        Self {
            profile,
            state: SessionState::NoSession,
            dev_prefill_done: false,
            last_redirect: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Leave `NoSession`
    ///
    /// A saved account resumes unless the screen was reached by logging out.
    pub fn resolve_mount(
        &mut self,
        saved: &SavedAccounts,
        after_logout: bool,
        catalog: &NetworkCatalog,
    ) -> MountDecision {
        if let Some(account) = saved.last_active.as_ref().filter(|_| !after_logout) {
            let custom_address = match account.network {
                NetworkCode::CustomNode => account.peer_address.as_deref().unwrap_or_default(),
                _ => "",
            };
            let network = catalog.resolve(account.network, custom_address);
            self.state = SessionState::AutoLoggingIn;
            log::info!("Resuming saved account on {}", network.name);
            return MountDecision::AutoLogin(ActivationRequest::with_public_key(
                account.public_key.clone(),
                network,
            ));
        }

        self.state = SessionState::PromptingManualLogin;
        let prefill_passphrase = !self.profile.is_production() && !self.dev_prefill_done;
        self.dev_prefill_done = true;
        MountDecision::Prompt { prefill_passphrase }
    }

    /// Whether the pre-filled passphrase should be submitted on the next tick
    pub fn should_auto_submit(
        &self,
        autologin_flag: bool,
        after_logout: bool,
        passphrase: &str,
    ) -> bool {
        !self.profile.is_production() && autologin_flag && !after_logout && !passphrase.is_empty()
    }

    /// Decide how a valid submission proceeds
    ///
    /// `derived_address` is the address the passphrase opens; `current` is
    /// what the session store holds right now.
    pub fn resolve_submit(
        &mut self,
        submission: LoginSubmission,
        derived_address: &str,
        current: &SessionSnapshot,
    ) -> SubmitDecision {
        let reconnect = current.address.as_deref() == Some(derived_address)
            && current
                .network
                .as_ref()
                .is_some_and(|n| n.same_identity(&submission.network));
        if reconnect {
            log::debug!("Already logged in as {derived_address}, reconnecting");
            self.state = SessionState::SessionActive;
            return SubmitDecision::Reconnect;
        }
        SubmitDecision::Activate(ActivationRequest::with_passphrase(
            submission.passphrase,
            submission.network,
        ))
    }

    pub fn activation_succeeded(&mut self) {
        self.state = SessionState::SessionActive;
    }

    pub fn activation_failed(&mut self) {
        self.state = SessionState::PromptingManualLogin;
    }

    /// Whether a session change must trigger the redirect
    ///
    /// Fires when an address is present and the `(address, network)` pair
    /// differs from `previous`, at most once per distinct pair.
    pub fn session_changed(&mut self, previous: &SessionSnapshot, current: &SessionSnapshot) -> bool {
        let (Some(address), Some(network)) = (&current.address, &current.network) else {
            return false;
        };
        if current.same_login(previous) {
            return false;
        }
        self.record_redirect(address, network)
    }

    /// Remember a redirect; `false` when this pair was already redirected
    pub fn record_redirect(&mut self, address: &str, network: &Network) -> bool {
        let seen = self
            .last_redirect
            .as_ref()
            .is_some_and(|(a, n)| a == address && n.same_identity(network));
        if seen {
            return false;
        }
        self.last_redirect = Some((address.to_string(), network.clone()));
        self.state = SessionState::SessionActive;
        true
    }
}
