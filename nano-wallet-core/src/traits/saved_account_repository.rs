//! Saved accounts persistence abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{SavedAccount, SavedAccounts};

/// Saved Accounts Repository Trait
///
/// Platform implementation:
/// - App: `JsonFileStore`
#[async_trait]
pub trait SavedAccountRepository: Send + Sync {
    /// Load the saved-accounts cache
    async fn load(&self) -> CoreResult<SavedAccounts>;

    /// Remember `account` as the last active one
    ///
    /// # Arguments
    /// * `account` - account to remember
    async fn save_active(&self, account: &SavedAccount) -> CoreResult<()>;
}
