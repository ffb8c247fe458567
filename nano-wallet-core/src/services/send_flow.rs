//! Send flow
//!
//! Multi-step transfer: amount and recipient, the first passphrase when the
//! account is locked, the second passphrase when one is registered, then
//! confirmation and result.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{CoreError, CoreResult};
use crate::i18n::keys;
use crate::services::{log_failure, ServiceContext};
use crate::types::{Account, HttpMethod};

/// Beddows per LSK
pub const BEDDOWS_PER_LSK: u64 = 100_000_000;

/// Fee of a transfer (0.1 LSK)
pub const FEE_BEDDOWS: u64 = 10_000_000;

const MAX_FRACTION_DIGITS: usize = 8;

static RECIPIENT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\d{1,21}[Ll]$").ok());

/// Steps of the send flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SendStep {
    Form,
    FirstPassphrase,
    SecondPassphrase,
    Confirm,
    Result,
}

/// Amount and recipient inputs; errors are `""` when valid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendForm {
    pub amount: String,
    pub recipient: String,
    pub amount_error: String,
    pub recipient_error: String,
}

/// Outcome shown in the result step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResult {
    pub success: bool,
    pub message: String,
    pub transaction_id: Option<String>,
}

/// Send flow of one account
pub struct SendFlow {
    ctx: Arc<ServiceContext>,
    account: Account,
    step: SendStep,
    form: SendForm,
    passphrase: Option<String>,
    second_passphrase: Option<String>,
    passphrase_error: String,
    result: Option<SendResult>,
}

impl SendFlow {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, account: Account) -> Self {
        let passphrase = account.passphrase.clone();
        Self {
            ctx,
            account,
            step: SendStep::Form,
            form: SendForm::default(),
            passphrase,
            second_passphrase: None,
            passphrase_error: String::new(),
            result: None,
        }
    }

    pub fn step(&self) -> SendStep {
        self.step
    }

    pub fn form(&self) -> &SendForm {
        &self.form
    }

    /// Error of the passphrase step currently shown
    pub fn passphrase_error(&self) -> &str {
        &self.passphrase_error
    }

    pub fn result(&self) -> Option<&SendResult> {
        self.result.as_ref()
    }

    // ===== Form step =====

    pub fn set_amount(&mut self, value: &str) {
        self.form.amount = value.to_string();
        self.form.amount_error = match parse_amount(value) {
            None => self.ctx.localizer().translate(keys::INVALID_AMOUNT),
            Some(beddows) if beddows.saturating_add(FEE_BEDDOWS) > self.account.balance => {
                self.ctx.localizer().translate(keys::INSUFFICIENT_FUNDS)
            }
            Some(_) => String::new(),
        };
    }

    pub fn set_recipient(&mut self, value: &str) {
        self.form.recipient = value.to_string();
        let valid = RECIPIENT.as_ref().is_some_and(|re| re.is_match(value));
        self.form.recipient_error = if valid {
            String::new()
        } else {
            self.ctx.localizer().translate(keys::INVALID_ADDRESS)
        };
    }

    /// Whether the form step's next control is enabled
    pub fn can_proceed(&self) -> bool {
        let f = &self.form;
        !f.amount.is_empty()
            && !f.recipient.is_empty()
            && f.amount_error.is_empty()
            && f.recipient_error.is_empty()
    }

    /// Leave the form step
    pub fn next(&mut self) -> CoreResult<SendStep> {
        self.expect_step(SendStep::Form)?;
        if !self.can_proceed() {
            return Err(CoreError::ValidationError(
                "Send form has errors".to_string(),
            ));
        }
        self.step = if self.passphrase.is_none() {
            SendStep::FirstPassphrase
        } else {
            self.after_first_passphrase()
        };
        Ok(self.step)
    }

    // ===== Passphrase steps =====

    /// Unlock the account for this transfer
    ///
    /// A passphrase of another account keeps the step and sets the error.
    pub fn submit_first_passphrase(&mut self, passphrase: &str) -> CoreResult<SendStep> {
        self.expect_step(SendStep::FirstPassphrase)?;
        let keys_service = self.ctx.account_keys();
        if !keys_service.is_valid_passphrase(passphrase) {
            self.passphrase_error = self.ctx.localizer().translate(keys::PASSPHRASE_INVALID);
            return Ok(self.step);
        }
        if keys_service.address_from_passphrase(passphrase) != self.account.address {
            self.passphrase_error = self.ctx.localizer().translate(keys::PASSPHRASE_MISMATCH);
            return Ok(self.step);
        }
        self.passphrase_error.clear();
        self.passphrase = Some(passphrase.to_string());
        self.step = self.after_first_passphrase();
        Ok(self.step)
    }

    pub fn submit_second_passphrase(&mut self, passphrase: &str) -> CoreResult<SendStep> {
        self.expect_step(SendStep::SecondPassphrase)?;
        if !self.ctx.account_keys().is_valid_passphrase(passphrase) {
            self.passphrase_error = self.ctx.localizer().translate(keys::PASSPHRASE_INVALID);
            return Ok(self.step);
        }
        self.passphrase_error.clear();
        self.second_passphrase = Some(passphrase.to_string());
        self.step = SendStep::Confirm;
        Ok(self.step)
    }

    // ===== Confirm step =====

    /// Send the transfer through the active peer
    ///
    /// A refused or failed request is reported in the result, not as `Err`.
    pub async fn send(&mut self) -> CoreResult<SendResult> {
        self.expect_step(SendStep::Confirm)?;
        let secret = self
            .passphrase
            .clone()
            .ok_or_else(|| CoreError::InvalidState("Account is locked".to_string()))?;
        let amount = parse_amount(&self.form.amount)
            .ok_or_else(|| CoreError::ValidationError("Invalid amount".to_string()))?;

        let params = json!({
            "recipientId": self.form.recipient,
            "amount": amount,
            "secret": secret,
            "secondSecret": self.second_passphrase,
        });
        log::info!(
            "Sending {amount} beddows from {} to {}",
            self.account.address,
            self.form.recipient
        );
        let response = self
            .ctx
            .peer_client()
            .request_to_active_peer(HttpMethod::Put, "transactions", params)
            .await;

        let result = match response {
            Ok(value) => SendResult {
                success: true,
                message: self.ctx.localizer().translate(keys::SEND_SUCCESS),
                transaction_id: value
                    .get("transactionId")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
            },
            Err(e) => {
                log_failure("Sending transaction", &e);
                SendResult {
                    success: false,
                    message: self.ctx.localizer().translate(keys::SEND_FAILURE),
                    transaction_id: None,
                }
            }
        };
        self.step = SendStep::Result;
        self.result = Some(result.clone());
        Ok(result)
    }

    fn after_first_passphrase(&self) -> SendStep {
        if self.account.second_signature {
            SendStep::SecondPassphrase
        } else {
            SendStep::Confirm
        }
    }

    fn expect_step(&self, expected: SendStep) -> CoreResult<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(CoreError::InvalidState(format!(
                "Expected send step {expected:?}, current step is {:?}",
                self.step
            )))
        }
    }
}

/// Parse a positive LSK amount with up to eight decimals into beddows
pub fn parse_amount(value: &str) -> Option<u64> {
    let value = value.trim();
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if whole.is_empty()
        || !digits(whole)
        || !digits(fraction)
        || fraction.len() > MAX_FRACTION_DIGITS
        || (value.contains('.') && fraction.is_empty())
    {
        return None;
    }

    let whole: u64 = whole.parse().ok()?;
    let fraction: u64 = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{fraction:0<width$}", width = MAX_FRACTION_DIGITS);
        padded.parse().ok()?
    };
    let beddows = whole.checked_mul(BEDDOWS_PER_LSK)?.checked_add(fraction)?;
    (beddows > 0).then_some(beddows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        create_test_context, test_account, GENESIS_PASSPHRASE, SECOND_PASSPHRASE,
    };
    use crate::types::HttpMethod;
    use serde_json::Value;

    const RECIPIENT_ADDRESS: &str = "537318935439898807L";
    const SUCCESS: &str = "Transaction is being processed and will be confirmed. It may take up to 15 minutes to be secured in the blockchain.";
    const FAILURE: &str = "An error occurred while creating the transaction.";

    fn fill(flow: &mut SendFlow) {
        flow.set_amount("1");
        flow.set_recipient(RECIPIENT_ADDRESS);
    }

    #[test]
    fn amounts_convert_to_beddows() {
        assert_eq!(parse_amount("1"), Some(100_000_000));
        assert_eq!(parse_amount("0.1"), Some(10_000_000));
        assert_eq!(parse_amount("12.00000001"), Some(1_200_000_001));
        for bad in ["", "0", "-1", "1.", ".5", "1.123456789", "abc", "1e8"] {
            assert_eq!(parse_amount(bad), None, "{bad}");
        }
    }

    #[test]
    fn empty_account_has_insufficient_funds() {
        let (ctx, _, _, _) = create_test_context();
        let account = Account {
            balance: 0,
            ..test_account()
        };
        let mut flow = SendFlow::new(ctx, account);
        fill(&mut flow);

        assert_eq!(flow.form().amount_error, "Insufficient funds");
        assert!(!flow.can_proceed());
        assert!(matches!(flow.next(), Err(CoreError::ValidationError(_))));
    }

    #[test]
    fn fee_counts_against_balance() {
        let (ctx, _, _, _) = create_test_context();
        let account = Account {
            balance: BEDDOWS_PER_LSK,
            ..test_account()
        };
        let mut flow = SendFlow::new(ctx, account);
        flow.set_amount("1");
        assert_eq!(flow.form().amount_error, "Insufficient funds");
        flow.set_amount("0.9");
        assert_eq!(flow.form().amount_error, "");
    }

    #[test]
    fn recipient_must_be_an_address() {
        let (ctx, _, _, _) = create_test_context();
        let mut flow = SendFlow::new(ctx, test_account());
        flow.set_recipient("537318935439898807");
        assert_eq!(flow.form().recipient_error, "Invalid address");
        flow.set_recipient("537318935439898807l");
        assert_eq!(flow.form().recipient_error, "");
    }

    #[tokio::test]
    async fn unlocked_account_sends() {
        let (ctx, peer, _, _) = create_test_context();
        peer.set_responder(|_, _, _| Ok(serde_json::json!({ "transactionId": "Some ID" })))
            .await;
        let mut flow = SendFlow::new(ctx, test_account());
        fill(&mut flow);

        assert_eq!(flow.next().unwrap(), SendStep::Confirm);
        let result = flow.send().await.unwrap();
        assert!(result.success);
        assert_eq!(result.message, SUCCESS);
        assert_eq!(result.transaction_id.as_deref(), Some("Some ID"));
        assert_eq!(flow.step(), SendStep::Result);

        let requests = peer.requests().await;
        let (method, path, params) = &requests[0];
        assert_eq!(*method, HttpMethod::Put);
        assert_eq!(path, "transactions");
        assert_eq!(params["recipientId"], RECIPIENT_ADDRESS);
        assert_eq!(params["amount"], 100_000_000);
        assert_eq!(params["secret"], GENESIS_PASSPHRASE);
        assert_eq!(params["secondSecret"], Value::Null);
    }

    #[tokio::test]
    async fn failed_send_shows_error_message() {
        let (ctx, peer, _, _) = create_test_context();
        peer.set_responder(|_, _, _| Err(CoreError::NoActivePeer)).await;
        let mut flow = SendFlow::new(ctx, test_account());
        fill(&mut flow);
        flow.next().unwrap();

        let result = flow.send().await.unwrap();
        assert!(!result.success);
        assert_eq!(result.message, FAILURE);
    }

    #[tokio::test]
    async fn locked_account_needs_first_passphrase() {
        let (ctx, peer, _, _) = create_test_context();
        let account = Account {
            passphrase: None,
            ..test_account()
        };
        let mut flow = SendFlow::new(ctx, account);
        fill(&mut flow);

        assert_eq!(flow.next().unwrap(), SendStep::FirstPassphrase);
        assert!(matches!(flow.send().await, Err(CoreError::InvalidState(_))));

        assert_eq!(
            flow.submit_first_passphrase(SECOND_PASSPHRASE).unwrap(),
            SendStep::FirstPassphrase
        );
        assert!(!flow.passphrase_error().is_empty());

        assert_eq!(
            flow.submit_first_passphrase(GENESIS_PASSPHRASE).unwrap(),
            SendStep::Confirm
        );
        assert!(flow.send().await.unwrap().success);
        assert_eq!(peer.requests().await[0].2["secret"], GENESIS_PASSPHRASE);
    }

    #[tokio::test]
    async fn second_signature_needs_second_passphrase() {
        let (ctx, peer, _, _) = create_test_context();
        let account = Account {
            passphrase: None,
            second_signature: true,
            ..test_account()
        };
        let mut flow = SendFlow::new(ctx, account);
        fill(&mut flow);

        flow.next().unwrap();
        assert_eq!(
            flow.submit_first_passphrase(GENESIS_PASSPHRASE).unwrap(),
            SendStep::SecondPassphrase
        );
        assert_eq!(
            flow.submit_second_passphrase("not a passphrase").unwrap(),
            SendStep::SecondPassphrase
        );
        assert_eq!(
            flow.submit_second_passphrase(SECOND_PASSPHRASE).unwrap(),
            SendStep::Confirm
        );
        flow.send().await.unwrap();
        assert_eq!(peer.requests().await[0].2["secondSecret"], SECOND_PASSPHRASE);
    }
}
