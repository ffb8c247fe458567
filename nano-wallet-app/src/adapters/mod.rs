//! Platform-agnostic adapters for the core's collaborator traits.

mod http_peer_client;
mod json_file_store;

pub use http_peer_client::HttpPeerClient;
pub use json_file_store::JsonFileStore;
