//! Account and session type definitions

use serde::{Deserialize, Serialize};

use nano_wallet_peer::AccountInfo;

use super::network::{Network, NetworkCode};

/// Account held by the session store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// `<number>L` address; empty when no account is logged in
    pub address: String,
    pub public_key: String,
    pub is_delegate: bool,
    /// Confirmed balance in beddows
    pub balance: u64,
    /// Whether a second passphrase is registered
    pub second_signature: bool,
    /// Passphrase kept in memory; `None` means the account is locked
    #[serde(skip_serializing)]
    pub passphrase: Option<String>,
    /// Set by the session store right after a logout
    pub after_logout: bool,
}

impl Account {
    pub fn is_locked(&self) -> bool {
        self.passphrase.is_none()
    }

    pub fn has_address(&self) -> bool {
        !self.address.is_empty()
    }

    /// Build an account from a node answer
    pub fn from_info(info: AccountInfo, is_delegate: bool, passphrase: Option<String>) -> Self {
        Self {
            second_signature: info.has_second_signature(),
            address: info.address,
            public_key: info.public_key,
            is_delegate,
            balance: info.balance,
            passphrase,
            after_logout: false,
        }
    }
}

/// Account/peer pair the session store reports as active
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSession {
    pub account: Account,
    pub network: Network,
}

/// What the session store currently holds, as seen by the login screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Address of the logged-in account, if any
    pub address: Option<String>,
    pub public_key: Option<String>,
    /// Network of the active peer, if any
    pub network: Option<Network>,
    pub is_delegate: bool,
    /// The session store's account was just logged out
    pub after_logout: bool,
}

impl SessionSnapshot {
    /// Snapshot of the session store's account and active network
    pub fn from_account(account: &Account, network: Option<Network>) -> Self {
        Self {
            address: account.has_address().then(|| account.address.clone()),
            public_key: (!account.public_key.is_empty()).then(|| account.public_key.clone()),
            network,
            is_delegate: account.is_delegate,
            after_logout: account.after_logout,
        }
    }

    pub fn from_session(session: &ActiveSession) -> Self {
        Self::from_account(&session.account, Some(session.network.clone()))
    }

    /// Same address and same network identity as `other`
    pub fn same_login(&self, other: &SessionSnapshot) -> bool {
        self.address.is_some()
            && self.address == other.address
            && match (&self.network, &other.network) {
                (Some(a), Some(b)) => a.same_identity(b),
                _ => false,
            }
    }
}

/// Account remembered across application restarts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedAccount {
    pub public_key: String,
    pub network: NetworkCode,
    /// Node URL, only meaningful for a custom node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_address: Option<String>,
}

/// Persisted saved-accounts cache
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedAccounts {
    pub last_active: Option<SavedAccount>,
}

/// Request sent to the peer-activation collaborator
///
/// Exactly one of `passphrase` and `public_key` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationRequest {
    pub passphrase: Option<String>,
    pub public_key: Option<String>,
    pub network: Network,
}

impl ActivationRequest {
    pub fn with_passphrase(passphrase: String, network: Network) -> Self {
        Self {
            passphrase: Some(passphrase),
            public_key: None,
            network,
        }
    }

    pub fn with_public_key(public_key: String, network: Network) -> Self {
        Self {
            passphrase: None,
            public_key: Some(public_key),
            network,
        }
    }
}
