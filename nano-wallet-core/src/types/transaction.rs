//! Transaction list type definitions

use serde::{Deserialize, Serialize};

use nano_wallet_peer::TransactionRecord;

use crate::i18n::keys;

/// Direction filter of the transaction list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionFilter {
    #[default]
    All,
    Incoming,
    Outgoing,
}

impl TransactionFilter {
    /// Filters in the order the list tabs show them
    pub fn all() -> &'static [TransactionFilter] {
        &[
            TransactionFilter::All,
            TransactionFilter::Outgoing,
            TransactionFilter::Incoming,
        ]
    }

    /// Translation key of the filter's tab label
    pub fn label(self) -> &'static str {
        match self {
            TransactionFilter::All => keys::FILTER_ALL,
            TransactionFilter::Incoming => keys::FILTER_INCOMING,
            TransactionFilter::Outgoing => keys::FILTER_OUTGOING,
        }
    }
}

/// One page of transactions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPage {
    pub transactions: Vec<TransactionRecord>,
    /// Total number of matching transactions on the node
    pub count: u64,
    pub filter: TransactionFilter,
}

impl TransactionPage {
    /// Whether the node holds more transactions than loaded so far
    pub fn has_more(&self) -> bool {
        u64::try_from(self.transactions.len()).is_ok_and(|loaded| loaded < self.count)
    }
}
