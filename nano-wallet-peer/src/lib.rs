//! # nano-wallet-peer
//!
//! HTTP client for the node API a Nano Wallet talks to.
//!
//! ## Endpoints
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | node status | `GET /api/loader/status` |
//! | open account by passphrase | `POST /api/accounts/open` |
//! | account by address | `GET /api/accounts?address=` |
//! | delegate lookup | `GET /api/delegates/get?publicKey=` |
//! | transaction list | `GET /api/transactions` |
//! | send transaction | `PUT /api/transactions` |
//!
//! Every response is wrapped in a `{"success": bool, ...}` envelope; a
//! `success: false` answer surfaces as [`PeerError::Rejected`].
//!
//! ## TLS Backend
//!
//! - **`rustls`** *(default)*
//! - **`native-tls`**
//!
//! ## Usage
//!
//! ```rust,no_run
//! use nano_wallet_peer::HttpPeer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let peer = HttpPeer::new("https://testnet.lisk.io")?;
//!     peer.status().await?;
//!     let account = peer.get_account("16313739661670634666L").await?;
//!     println!("{} holds {} beddows", account.address, account.balance);
//!     Ok(())
//! }
//! ```

mod error;
mod http_client;
mod log_sanitizer;
mod peer;
mod types;

pub use error::{PeerError, Result};
pub use peer::{HttpPeer, address_from_public_key};
pub use types::{AccountInfo, HttpMethod, TransactionRecord, TransactionsResponse};
