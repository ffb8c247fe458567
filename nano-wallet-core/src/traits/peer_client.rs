//! Peer/session collaborator abstract Trait

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CoreResult;
use crate::types::{ActivationRequest, ActiveSession, HttpMethod};

/// Peer Client Trait
///
/// Owns the active peer and the logged-in account on behalf of the core.
///
/// Platform implementation:
/// - App: `HttpPeerClient` (reqwest, via `nano-wallet-peer`)
#[async_trait]
pub trait PeerClient: Send + Sync {
    /// Activate a peer for the request's network and log the account in
    ///
    /// # Arguments
    /// * `request` - passphrase or public key plus target network
    ///
    /// # Returns
    /// * `Ok(session)` - the peer is active and the account is loaded
    /// * `Err(_)` - activation failed; the previous peer stays active
    async fn activate(&self, request: &ActivationRequest) -> CoreResult<ActiveSession>;

    /// Send a request to the currently active peer
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - endpoint below `/api/` (e.g. `transactions`)
    /// * `params` - query parameters (GET) or JSON body (POST/PUT)
    async fn request_to_active_peer(
        &self,
        method: HttpMethod,
        path: &str,
        params: Value,
    ) -> CoreResult<Value>;
}
