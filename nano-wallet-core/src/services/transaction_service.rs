//! Transaction list service

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::error::{CoreError, CoreResult};
use crate::services::{log_failure, ServiceContext};
use crate::types::{HttpMethod, TransactionFilter, TransactionPage, TransactionsResponse};

/// Default page size of the transaction list
pub const PAGE_SIZE: u32 = 25;

/// Transaction list service
pub struct TransactionService {
    ctx: Arc<ServiceContext>,
}

impl TransactionService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// List transactions of `address` through the active peer
    ///
    /// # Arguments
    /// * `address` - account whose transactions are listed
    /// * `filter` - direction filter
    /// * `offset` - number of transactions to skip
    /// * `limit` - page size
    pub async fn list(
        &self,
        address: &str,
        filter: TransactionFilter,
        offset: u64,
        limit: u32,
    ) -> CoreResult<TransactionPage> {
        let params = Self::filter_params(address, filter, offset, limit);
        let value = self
            .ctx
            .peer_client()
            .request_to_active_peer(HttpMethod::Get, "transactions", params)
            .await
            .inspect_err(|e| log_failure("Listing transactions", e))?;

        let response: TransactionsResponse = serde_json::from_value(value)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;
        log::debug!(
            "Loaded {} of {} {} transactions for {address}",
            response.transactions.len(),
            response.count,
            filter.label()
        );
        Ok(TransactionPage {
            transactions: response.transactions,
            count: response.count,
            filter,
        })
    }

    /// First page with the default page size
    pub async fn first_page(
        &self,
        address: &str,
        filter: TransactionFilter,
    ) -> CoreResult<TransactionPage> {
        self.list(address, filter, 0, PAGE_SIZE).await
    }

    /// Append the next page to `page`
    ///
    /// Returns `false` without a request when everything is loaded.
    pub async fn load_more(&self, address: &str, page: &mut TransactionPage) -> CoreResult<bool> {
        if !page.has_more() {
            return Ok(false);
        }
        let offset = u64::try_from(page.transactions.len())
            .map_err(|e| CoreError::InvalidState(e.to_string()))?;
        let next = self.list(address, page.filter, offset, PAGE_SIZE).await?;
        if next.transactions.is_empty() {
            // The node reported more than it returns; stop paging
            page.count = offset;
            return Ok(false);
        }
        page.transactions.extend(next.transactions);
        page.count = next.count;
        Ok(true)
    }

    /// Tabs of the transaction list: each filter with its translated label
    pub fn filter_options(&self) -> Vec<(TransactionFilter, String)> {
        TransactionFilter::all()
            .iter()
            .map(|f| (*f, self.ctx.localizer().translate(f.label())))
            .collect()
    }

    /// Request parameters of a filtered listing
    ///
    /// `All` sets both sides, which the node treats as "either side".
    pub fn filter_params(
        address: &str,
        filter: TransactionFilter,
        offset: u64,
        limit: u32,
    ) -> Value {
        let mut params = Map::new();
        if matches!(filter, TransactionFilter::All | TransactionFilter::Outgoing) {
            params.insert("senderId".to_string(), json!(address));
        }
        if matches!(filter, TransactionFilter::All | TransactionFilter::Incoming) {
            params.insert("recipientId".to_string(), json!(address));
        }
        params.insert("offset".to_string(), json!(offset));
        params.insert("limit".to_string(), json!(limit));
        params.insert("orderBy".to_string(), json!("timestamp:desc"));
        Value::Object(params)
    }
}
