//! German translation (de-DE)

use super::keys;

pub fn lookup(key: &str) -> Option<&'static str> {
    let text = match key {
        keys::MAINNET => "Mainnet",
        keys::TESTNET => "Testnet",
        keys::CUSTOM_NODE => "Eigener Knoten",
        keys::URL_INVALID => "URL ist ungültig",
        keys::PASSPHRASE_WORD_COUNT => {
            "Die Passphrase sollte 12 Wörter haben, die eingegebene hat {{length}}"
        }
        keys::PASSPHRASE_UPPERCASE => "Die Passphrase enthält Großbuchstaben",
        keys::PASSPHRASE_INVALID => "Die Passphrase ist ungültig",
        keys::INSUFFICIENT_FUNDS => "Unzureichendes Guthaben",
        keys::INVALID_ADDRESS => "Ungültige Adresse",
        keys::INVALID_AMOUNT => "Ungültiger Betrag",
        keys::PASSPHRASE_MISMATCH => "Die Passphrase gehört nicht zum aktiven Konto",
        keys::SEND_SUCCESS => "Die Transaktion wird verarbeitet und bestätigt. Es kann bis zu 15 Minuten dauern, bis sie in der Blockchain gesichert ist.",
        keys::SEND_FAILURE => "Beim Erstellen der Transaktion ist ein Fehler aufgetreten.",
        keys::FILTER_ALL => "Alle",
        keys::FILTER_INCOMING => "Eingehend",
        keys::FILTER_OUTGOING => "Ausgehend",
        _ => return None,
    };
    Some(text)
}
