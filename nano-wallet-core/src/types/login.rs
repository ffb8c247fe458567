//! Login form type definitions

use serde::{Deserialize, Serialize};

use super::network::{Network, NetworkCode};

/// Fields of the login form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginField {
    /// Custom node address
    Address,
    Passphrase,
    /// Network selector; carries the network index
    Network,
}

/// Transient state of the login form
///
/// Validity fields hold `""` when the field is valid, a message otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub passphrase: String,
    pub address: String,
    pub selected_network: NetworkCode,
    pub address_validity: String,
    pub passphrase_validity: String,
}

/// Result of validating a custom node address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressValidation {
    pub address: String,
    pub address_validity: String,
}

impl AddressValidation {
    pub fn is_valid(&self) -> bool {
        self.address_validity.is_empty()
    }
}

/// Result of validating a passphrase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassphraseValidation {
    pub passphrase: String,
    pub passphrase_validity: String,
}

impl PassphraseValidation {
    pub fn is_valid(&self) -> bool {
        self.passphrase_validity.is_empty()
    }
}

/// Payload emitted by a valid form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSubmission {
    pub passphrase: String,
    pub network: Network,
}

/// States of the session resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    #[default]
    NoSession,
    PromptingManualLogin,
    AutoLoggingIn,
    SessionActive,
}
