//! Nano Wallet Core Library
//!
//! Platform-independent login and session logic for a Lisk wallet client:
//! - Network catalog and credential validation
//! - Session resolution (auto-login, development pre-fill, reconnection)
//! - Login form controller and post-login routing
//! - Transaction listing and the send flow
//!
//! Collaborators (peer/session store, persisted entries, saved accounts, key
//! derivation) are abstracted through traits and injected via
//! [`ServiceContext`].

pub mod config;
pub mod error;
pub mod i18n;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::{BuildProfile, LoginConfig};
pub use error::{CoreError, CoreResult};
pub use i18n::{Language, Localizer};
pub use services::ServiceContext;
pub use traits::{AccountKeys, KeyValueStore, PeerClient, SavedAccountRepository};
