//! Network type definitions

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Known network kinds, in declaration order.
///
/// The index of each variant is stable: it is the value of the network
/// selector and the value persisted under the `network` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NetworkCode {
    #[default]
    Mainnet,
    Testnet,
    CustomNode,
}

impl NetworkCode {
    /// All codes in declaration order
    pub fn all() -> &'static [NetworkCode] {
        &[
            NetworkCode::Mainnet,
            NetworkCode::Testnet,
            NetworkCode::CustomNode,
        ]
    }

    /// Stable index of the code
    pub fn index(self) -> usize {
        match self {
            NetworkCode::Mainnet => 0,
            NetworkCode::Testnet => 1,
            NetworkCode::CustomNode => 2,
        }
    }

    /// Look a code up by its stable index
    pub fn from_index(index: usize) -> CoreResult<Self> {
        Self::all()
            .get(index)
            .copied()
            .ok_or_else(|| CoreError::InvalidNetworkCode(index.to_string()))
    }

    /// Parse a persisted or form value (`"0"`, `"1"`, `"2"`)
    pub fn parse(value: &str) -> CoreResult<Self> {
        value
            .trim()
            .parse::<usize>()
            .map_err(|_| CoreError::InvalidNetworkCode(value.to_string()))
            .and_then(Self::from_index)
    }

    /// Untranslated display name, also used as translation key
    pub fn name(self) -> &'static str {
        match self {
            NetworkCode::Mainnet => "Mainnet",
            NetworkCode::Testnet => "Testnet",
            NetworkCode::CustomNode => "Custom Node",
        }
    }

    /// Fixed endpoint of the network; `None` for a custom node
    pub fn well_known_address(self) -> Option<&'static str> {
        match self {
            NetworkCode::Mainnet => Some("https://hub21.lisk.io"),
            NetworkCode::Testnet => Some("https://testnet.lisk.io"),
            NetworkCode::CustomNode => None,
        }
    }
}

/// A network the wallet can connect to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub code: NetworkCode,
    pub name: String,
    /// Node URL. User-supplied for a custom node, fixed otherwise.
    pub address: Option<String>,
}

impl Network {
    /// Same network identity: equal `code` and `address`.
    pub fn same_identity(&self, other: &Network) -> bool {
        self.code == other.code && self.address == other.address
    }
}

/// Entry of the network selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkOption {
    pub label: String,
    pub value: usize,
}
