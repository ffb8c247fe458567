//! Translation keys
//!
//! Keys are the English source strings; `{{name}}` marks an interpolation slot.

// ============================================================================
// Networks
// ============================================================================

pub const MAINNET: &str = "Mainnet";
pub const TESTNET: &str = "Testnet";
pub const CUSTOM_NODE: &str = "Custom Node";

// ============================================================================
// Login form
// ============================================================================

pub const URL_INVALID: &str = "URL is invalid";
pub const PASSPHRASE_WORD_COUNT: &str =
    "Passphrase should have 12 words, entered passphrase has {{length}}";
pub const PASSPHRASE_UPPERCASE: &str = "Passphrase contains uppercase letters";
pub const PASSPHRASE_INVALID: &str = "Passphrase is not valid";

// ============================================================================
// Send flow
// ============================================================================

pub const INSUFFICIENT_FUNDS: &str = "Insufficient funds";
pub const INVALID_ADDRESS: &str = "Invalid address";
pub const INVALID_AMOUNT: &str = "Invalid amount";
pub const PASSPHRASE_MISMATCH: &str = "Entered passphrase does not belong to the active account";
pub const SEND_SUCCESS: &str = "Transaction is being processed and will be confirmed. It may take up to 15 minutes to be secured in the blockchain.";
pub const SEND_FAILURE: &str = "An error occurred while creating the transaction.";

// ============================================================================
// Transaction filters
// ============================================================================

pub const FILTER_ALL: &str = "All";
pub const FILTER_INCOMING: &str = "Incoming";
pub const FILTER_OUTGOING: &str = "Outgoing";
