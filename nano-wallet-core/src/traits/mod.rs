//! Collaborator abstraction trait definition

mod account_keys;
mod key_value_store;
mod peer_client;
mod saved_account_repository;

pub use account_keys::AccountKeys;
pub use key_value_store::{keys, InMemoryKeyValueStore, KeyValueStore};
pub use peer_client::PeerClient;
pub use saved_account_repository::SavedAccountRepository;
