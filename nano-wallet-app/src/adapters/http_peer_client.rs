//! HTTP peer client
//!
//! Implements the core's `PeerClient` over `nano_wallet_peer::HttpPeer`.

use async_trait::async_trait;
use nano_wallet_core::traits::PeerClient;
use nano_wallet_core::types::{Account, ActivationRequest, ActiveSession, HttpMethod};
use nano_wallet_core::{CoreError, CoreResult};
use nano_wallet_peer::{HttpPeer, PeerError};
use serde_json::Value;
use tokio::sync::RwLock;

/// Peer client talking to a node's HTTP API
pub struct HttpPeerClient {
    max_retries: u32,
    /// Replaced only by a successful activation
    active: RwLock<Option<HttpPeer>>,
}

impl HttpPeerClient {
    #[must_use]
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            active: RwLock::new(None),
        }
    }

    async fn active_peer(&self) -> CoreResult<HttpPeer> {
        self.active
            .read()
            .await
            .clone()
            .ok_or(CoreError::NoActivePeer)
    }
}

/// The node refusing the account is a failed login, not a peer fault
fn activation_error(error: PeerError) -> CoreError {
    match error {
        PeerError::Rejected { .. } | PeerError::AccountNotFound { .. } => {
            CoreError::ActivationFailed(error.to_string())
        }
        other => CoreError::Peer(other),
    }
}

#[async_trait]
impl PeerClient for HttpPeerClient {
    async fn activate(&self, request: &ActivationRequest) -> CoreResult<ActiveSession> {
        let node = request.network.address.as_deref().ok_or_else(|| {
            CoreError::ValidationError(format!("{} has no node address", request.network.name))
        })?;
        let peer = HttpPeer::new(node)?.with_max_retries(self.max_retries);
        peer.status().await?;

        let info = match (&request.passphrase, &request.public_key) {
            (Some(secret), _) => peer.open_account(secret).await,
            (None, Some(public_key)) => peer.get_account_by_public_key(public_key).await,
            (None, None) => {
                return Err(CoreError::ValidationError(
                    "Activation needs a passphrase or a public key".to_string(),
                ))
            }
        }
        .map_err(activation_error)?;

        let is_delegate = match peer.is_delegate(&info.public_key).await {
            Ok(flag) => flag,
            Err(e) => {
                log::warn!("Delegate lookup failed, assuming regular account: {e}");
                false
            }
        };
        let account = Account::from_info(info, is_delegate, request.passphrase.clone());
        log::info!("Logged in as {} on {}", account.address, peer.node());

        *self.active.write().await = Some(peer);
        Ok(ActiveSession {
            account,
            network: request.network.clone(),
        })
    }

    async fn request_to_active_peer(
        &self,
        method: HttpMethod,
        path: &str,
        params: Value,
    ) -> CoreResult<Value> {
        let peer = self.active_peer().await?;
        Ok(peer.request(method, path, &params).await?)
    }
}
