//! Type definitions module

mod account;
mod login;
mod network;
mod transaction;

pub use account::{
    Account, ActivationRequest, ActiveSession, SavedAccount, SavedAccounts, SessionSnapshot,
};
pub use login::{
    AddressValidation, FormState, LoginField, LoginSubmission, PassphraseValidation,
    SessionState,
};
pub use network::{Network, NetworkCode, NetworkOption};
pub use transaction::{TransactionFilter, TransactionPage};

// Re-export public types of the peer library
pub use nano_wallet_peer::{AccountInfo, HttpMethod, TransactionRecord, TransactionsResponse};
