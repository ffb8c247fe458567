//! Credential validation
//!
//! Custom node URL checks and passphrase validity messages. An empty message
//! means "valid".

use std::sync::{Arc, LazyLock};

use regex::Regex;
use url::Url;

use crate::i18n::{keys, Localizer};
use crate::traits::AccountKeys;
use crate::types::{AddressValidation, PassphraseValidation};

/// Number of words of a valid passphrase
const PASSPHRASE_WORDS: usize = 12;

/// Dotted IPv4 or a domain with at least two labels of two word characters
static REMOTE_HOST: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(([0-9]{1,3}\.){3}[0-9]{1,3}|(\w{2,}\.)+\w{2,})").ok()
});

static HAS_SCHEME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:f|ht)tps?://").ok());

/// Credential validator
pub struct CredentialValidator {
    localizer: Arc<Localizer>,
    account_keys: Arc<dyn AccountKeys>,
}

impl CredentialValidator {
    #[must_use]
    pub fn new(localizer: Arc<Localizer>, account_keys: Arc<dyn AccountKeys>) -> Self {
        Self {
            localizer,
            account_keys,
        }
    }

    /// Validate a custom node address
    pub fn validate_address(&self, value: &str) -> AddressValidation {
        let address_validity = if is_valid_node_url(value) {
            String::new()
        } else {
            self.localizer.translate(keys::URL_INVALID)
        };
        AddressValidation {
            address: value.to_string(),
            address_validity,
        }
    }

    /// Carry a passphrase and the externally computed error, if any
    pub fn validate_passphrase(
        &self,
        value: &str,
        external_error: Option<&str>,
    ) -> PassphraseValidation {
        PassphraseValidation {
            passphrase: value.to_string(),
            passphrase_validity: external_error.unwrap_or_default().to_string(),
        }
    }

    /// Compute the passphrase error a passphrase input reports
    ///
    /// Returns `None` for a valid passphrase.
    pub fn passphrase_error(&self, value: &str) -> Option<String> {
        let words = value.split_whitespace().count();
        if words < PASSPHRASE_WORDS {
            return Some(self.localizer.translate_with(
                keys::PASSPHRASE_WORD_COUNT,
                &[("length", &words.to_string())],
            ));
        }
        if self.account_keys.is_valid_passphrase(value) {
            return None;
        }
        if value.chars().any(char::is_uppercase) {
            return Some(self.localizer.translate(keys::PASSPHRASE_UPPERCASE));
        }
        Some(self.localizer.translate(keys::PASSPHRASE_INVALID))
    }
}

/// Whether `value` is usable as a node URL
///
/// A missing `http(s)://`/`ftp(s)://` scheme defaults to `http://`. The host
/// must look remote, or be `localhost` with an explicit port.
pub fn is_valid_node_url(value: &str) -> bool {
    let has_scheme = HAS_SCHEME
        .as_ref()
        .is_some_and(|re| re.is_match(value));
    let candidate = if has_scheme {
        value.to_string()
    } else {
        format!("http://{value}")
    };

    let Ok(url) = Url::parse(&candidate) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };

    let is_remote = REMOTE_HOST.as_ref().is_some_and(|re| re.is_match(host));
    let is_localhost = host == "localhost" && url.port().is_some_and(|port| port >= 10);
    is_remote || is_localhost
}
