//! HTTP plumbing shared by the peer client
//!
//! Sending requests, logging, reading responses and unwrapping the
//! `{"success": bool, ...}` envelope every node endpoint answers with.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::PeerError;
use crate::log_sanitizer::truncate_for_log;

/// Default connect timeout (seconds)
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds)
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Create an HTTP client with timeout configuration
pub fn create_http_client() -> Result<Client, PeerError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| PeerError::NetworkError {
            node: String::new(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

/// Request helpers for node endpoints
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns status code and response text.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        node: &str,
        method_name: &str,
        path: &str,
    ) -> Result<(u16, String), PeerError> {
        log::debug!("[{node}] {method_name} {path}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                PeerError::Timeout {
                    node: node.to_string(),
                    detail: e.to_string(),
                }
            } else {
                PeerError::NetworkError {
                    node: node.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{node}] Response Status: {status_code}");

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{node}] Server error (HTTP {status_code})");
            return Err(PeerError::NetworkError {
                node: node.to_string(),
                detail: format!("HTTP {status_code}: {}", truncate_for_log(&body)),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| PeerError::NetworkError {
                node: node.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!("[{node}] Response Body: {}", truncate_for_log(&response_text));

        Ok((status_code, response_text))
    }

    /// Performs an HTTP request, retrying transient failures.
    ///
    /// Only network errors and timeouts are retried, with exponential backoff
    /// (100ms, 200ms, 400ms, ... capped at 10 seconds).
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        node: &str,
        method_name: &str,
        path: &str,
        max_retries: u32,
    ) -> Result<(u16, String), PeerError> {
        if max_retries == 0 {
            return Self::execute_request(request_builder, node, method_name, path).await;
        }

        let mut last_error = None;

        for attempt in 0..=max_retries {
            let Some(req) = request_builder.try_clone() else {
                log::warn!("[{node}] Cannot clone request, disabling retry");
                return Self::execute_request(request_builder, node, method_name, path).await;
            };

            match Self::execute_request(req, node, method_name, path).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < max_retries && e.is_retryable() => {
                    let delay = backoff_delay(attempt);
                    log::warn!(
                        "[{}] Node request failed ({}/{}), next try in {:.1}s: {}",
                        node,
                        attempt + 1,
                        max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| PeerError::NetworkError {
            node: node.to_string(),
            detail: "Retry loop ended without a response".to_string(),
        }))
    }

    /// Deserialize a response body
    pub fn parse_json<T>(response_text: &str, node: &str) -> Result<T, PeerError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{node}] JSON parse failed: {e}");
            log::error!("[{node}] Raw response: {}", truncate_for_log(response_text));
            PeerError::ParseError {
                node: node.to_string(),
                detail: e.to_string(),
            }
        })
    }

    /// Parse a node response and unwrap its `success` envelope.
    ///
    /// `success: false` becomes [`PeerError::Rejected`] carrying the node's
    /// `error` (or `message`) field.
    pub fn unwrap_envelope(response_text: &str, node: &str) -> Result<Value, PeerError> {
        let value: Value = Self::parse_json(response_text, node)?;
        if value.get("success").and_then(Value::as_bool) == Some(false) {
            let message = value
                .get("error")
                .or_else(|| value.get("message"))
                .and_then(Value::as_str)
                .unwrap_or("Unknown error")
                .to_string();
            return Err(PeerError::Rejected {
                node: node.to_string(),
                message,
            });
        }
        Ok(value)
    }
}

/// Delay before retry `attempt`: 100ms doubling, capped at 10s
fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20);
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(10_000))
}
