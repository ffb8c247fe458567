//! Wire types of the node HTTP API

use serde::{Deserialize, Deserializer, Serialize};

/// HTTP method used for a node request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    /// Whether repeating the request has no additional effect.
    pub fn is_idempotent(self) -> bool {
        matches!(self, Self::Get)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

/// Account as reported by `/api/accounts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub address: String,
    #[serde(default)]
    pub public_key: String,
    /// Confirmed balance in beddows.
    #[serde(default, deserialize_with = "string_or_number")]
    pub balance: u64,
    #[serde(default, deserialize_with = "string_or_number")]
    pub unconfirmed_balance: u64,
    /// `1` when a second passphrase is registered.
    #[serde(default, deserialize_with = "string_or_number")]
    pub second_signature: u64,
}

impl AccountInfo {
    pub fn has_second_signature(&self) -> bool {
        self.second_signature != 0
    }
}

/// Single transaction as reported by `/api/transactions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub recipient_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount: u64,
    #[serde(default, deserialize_with = "string_or_number")]
    pub fee: u64,
    #[serde(default, deserialize_with = "string_or_number")]
    pub timestamp: u64,
    #[serde(default, deserialize_with = "string_or_number")]
    pub confirmations: u64,
    /// Transaction type (0 = transfer).
    #[serde(default, rename = "type")]
    pub kind: u8,
}

/// Response body of `GET /api/transactions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionsResponse {
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
    /// Total number of matching transactions (the node may send it as a string).
    #[serde(default, deserialize_with = "string_or_number")]
    pub count: u64,
}

/// Node versions disagree on whether numeric fields are JSON numbers or strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(u64),
        Null,
    }

    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) if s.is_empty() => Ok(0),
        StringOrNumber::String(s) => s
            .parse::<u64>()
            .map_err(|e| Error::custom(format!("Invalid numeric string '{s}': {e}"))),
        StringOrNumber::Number(n) => Ok(n),
        StringOrNumber::Null => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_with_string_balance() {
        let json = r#"{
            "address": "16313739661670634666L",
            "publicKey": "c094ebee7ec0c50ebee32918655e089f6e1a604b83bcaa760293c61e0f18ab6f",
            "balance": "9985000000000000",
            "unconfirmedBalance": "9985000000000000",
            "secondSignature": 0
        }"#;
        let account: AccountInfo = serde_json::from_str(json).unwrap();
        assert_eq!(account.balance, 9_985_000_000_000_000);
        assert!(!account.has_second_signature());
    }

    #[test]
    fn transactions_with_string_count() {
        let json = r#"{"transactions":[{"id":"1","senderId":"123L","recipientId":"456L","amount":100000000,"fee":10000000,"type":0}],"count":"1000"}"#;
        let response: TransactionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.count, 1000);
        assert_eq!(response.transactions[0].recipient_id.as_deref(), Some("456L"));
    }

    #[test]
    fn only_get_is_idempotent() {
        assert!(HttpMethod::Get.is_idempotent());
        assert!(!HttpMethod::Put.is_idempotent());
    }
}
