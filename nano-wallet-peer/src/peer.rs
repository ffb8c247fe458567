//! HTTP peer bound to a single node

use reqwest::{Client, Url};
use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};

use crate::error::{PeerError, Result};
use crate::http_client::{HttpUtils, create_http_client};
use crate::log_sanitizer::redact_secrets;
use crate::types::{AccountInfo, HttpMethod};

/// Default number of retries for idempotent requests.
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Client for one node's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpPeer {
    node: String,
    base: Url,
    client: Client,
    max_retries: u32,
}

impl HttpPeer {
    /// Create a peer for `node_url` (e.g. `https://hub21.lisk.io`).
    pub fn new(node_url: &str) -> Result<Self> {
        let node = node_url.trim_end_matches('/').to_string();
        let base = Url::parse(&format!("{node}/api/")).map_err(|e| PeerError::InvalidNodeUrl {
            node: node.clone(),
            detail: e.to_string(),
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(PeerError::InvalidNodeUrl {
                node,
                detail: format!("unsupported scheme '{}'", base.scheme()),
            });
        }
        Ok(Self {
            node,
            base,
            client: create_http_client()?,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Override the retry budget for idempotent requests.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Node URL this peer talks to.
    pub fn node(&self) -> &str {
        &self.node
    }

    /// Issue a request against `/api/<path>`.
    ///
    /// GET parameters are sent as a query string (`null` entries are skipped);
    /// POST/PUT parameters as a JSON body. The `success` envelope is unwrapped.
    pub async fn request(&self, method: HttpMethod, path: &str, params: &Value) -> Result<Value> {
        let url = self.endpoint(path, method, params)?;
        let builder = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url).json(params),
            HttpMethod::Put => self.client.put(url).json(params),
        };
        if method != HttpMethod::Get {
            log::debug!("[{}] {} body: {}", self.node, method.as_str(), redact_secrets(params));
        }

        let retries = if method.is_idempotent() {
            self.max_retries
        } else {
            0
        };
        let (_, body) = HttpUtils::execute_request_with_retry(
            builder,
            &self.node,
            method.as_str(),
            path,
            retries,
        )
        .await?;
        HttpUtils::unwrap_envelope(&body, &self.node)
    }

    /// Check that the node is reachable and finished loading the chain.
    pub async fn status(&self) -> Result<()> {
        self.request(HttpMethod::Get, "loader/status", &Value::Null)
            .await
            .map(|_| ())
    }

    /// Open the account belonging to `secret`.
    pub async fn open_account(&self, secret: &str) -> Result<AccountInfo> {
        let value = self
            .request(HttpMethod::Post, "accounts/open", &json!({ "secret": secret }))
            .await?;
        self.account_field(value)
    }

    /// Look an account up by address.
    pub async fn get_account(&self, address: &str) -> Result<AccountInfo> {
        let value = self
            .request(HttpMethod::Get, "accounts", &json!({ "address": address }))
            .await
            .map_err(|e| match e {
                PeerError::Rejected { node, message } if message.contains("not found") => {
                    PeerError::AccountNotFound {
                        node,
                        address: address.to_string(),
                    }
                }
                other => other,
            })?;
        self.account_field(value)
    }

    /// Look an account up by its public key.
    pub async fn get_account_by_public_key(&self, public_key: &str) -> Result<AccountInfo> {
        let address = address_from_public_key(public_key).map_err(|detail| {
            PeerError::InvalidParameter {
                node: self.node.clone(),
                param: "publicKey".to_string(),
                detail,
            }
        })?;
        self.get_account(&address).await
    }

    /// Whether `public_key` is registered as a delegate.
    pub async fn is_delegate(&self, public_key: &str) -> Result<bool> {
        match self
            .request(
                HttpMethod::Get,
                "delegates/get",
                &json!({ "publicKey": public_key }),
            )
            .await
        {
            Ok(value) => Ok(value.get("delegate").is_some_and(|d| !d.is_null())),
            Err(PeerError::Rejected { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn account_field(&self, mut value: Value) -> Result<AccountInfo> {
        let account = value.get_mut("account").map(Value::take).ok_or_else(|| {
            PeerError::ParseError {
                node: self.node.clone(),
                detail: "response has no 'account' field".to_string(),
            }
        })?;
        serde_json::from_value(account).map_err(|e| PeerError::ParseError {
            node: self.node.clone(),
            detail: e.to_string(),
        })
    }

    fn endpoint(&self, path: &str, method: HttpMethod, params: &Value) -> Result<Url> {
        let mut url = self
            .base
            .join(path.trim_start_matches('/'))
            .map_err(|e| PeerError::InvalidNodeUrl {
                node: self.node.clone(),
                detail: e.to_string(),
            })?;
        if method == HttpMethod::Get {
            if let Some(query) = build_query(params) {
                url.set_query(Some(&query));
            }
        }
        Ok(url)
    }
}

/// Encode a flat JSON object as a query string, skipping `null` values.
fn build_query(params: &Value) -> Option<String> {
    let map: &Map<String, Value> = params.as_object()?;
    let pairs: Vec<String> = map
        .iter()
        .filter_map(|(key, value)| {
            let rendered = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some(format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&rendered)
            ))
        })
        .collect();
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("&"))
    }
}

/// Derive the `<number>L` address of a hex-encoded public key.
///
/// The address is the first eight bytes of `sha256(public_key)`, read
/// little-endian, followed by `L`.
pub fn address_from_public_key(public_key: &str) -> std::result::Result<String, String> {
    let bytes = hex::decode(public_key).map_err(|e| format!("not hex: {e}"))?;
    if bytes.len() != 32 {
        return Err(format!("expected 32 bytes, got {}", bytes.len()));
    }
    let digest = Sha256::digest(&bytes);
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    Ok(format!("{}L", u64::from_le_bytes(head)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unsupported_scheme() {
        let err = HttpPeer::new("ftp://node.example").unwrap_err();
        assert!(matches!(err, PeerError::InvalidNodeUrl { .. }));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let peer = HttpPeer::new("https://hub21.lisk.io/").unwrap();
        assert_eq!(peer.node(), "https://hub21.lisk.io");
    }

    #[test]
    fn get_endpoint_carries_query() {
        let peer = HttpPeer::new("http://localhost:4000").unwrap();
        let url = peer
            .endpoint(
                "transactions",
                HttpMethod::Get,
                &json!({ "senderId": "123L", "recipientId": null, "limit": 20 }),
            )
            .unwrap();
        assert_eq!(url.path(), "/api/transactions");
        let query = url.query().unwrap();
        assert!(query.contains("senderId=123L"));
        assert!(query.contains("limit=20"));
        assert!(!query.contains("recipientId"));
    }

    #[test]
    fn put_endpoint_has_no_query() {
        let peer = HttpPeer::new("http://localhost:4000").unwrap();
        let url = peer
            .endpoint("transactions", HttpMethod::Put, &json!({ "secret": "s" }))
            .unwrap();
        assert!(url.query().is_none());
    }

    #[test]
    fn address_from_known_public_key() {
        let address = address_from_public_key(
            "c094ebee7ec0c50ebee32918655e089f6e1a604b83bcaa760293c61e0f18ab6f",
        )
        .unwrap();
        assert_eq!(address, "16313739661670634666L");
    }

    #[test]
    fn address_from_short_key_fails() {
        assert!(address_from_public_key("abcd").is_err());
        assert!(address_from_public_key("zz").is_err());
    }
}
