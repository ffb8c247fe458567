//! Key derivation abstract Trait

/// Account Keys Trait
///
/// Derives account identity from a passphrase. Mnemonic dictionary and
/// checksum checks live behind this seam so the core only carries results.
pub trait AccountKeys: Send + Sync {
    /// `<number>L` address of the account the passphrase opens
    fn address_from_passphrase(&self, passphrase: &str) -> String;

    /// Whether the passphrase is a well-formed mnemonic
    fn is_valid_passphrase(&self, passphrase: &str) -> bool;
}
