//! Internationalization (i18n) module
//!
//! Key-based translation with English source strings as keys, plus a
//! language-change notification for components that cache translated text.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

mod de_de;
pub mod keys;

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// English (United States)
    #[default]
    EnUs,
    /// German (Germany)
    DeDe,
}

impl Language {
    /// Get all supported languages
    pub fn all() -> &'static [Language] {
        &[Language::EnUs, Language::DeDe]
    }

    /// Display name of the language, written in the language itself
    pub fn display_name(self) -> &'static str {
        match self {
            Language::EnUs => "English",
            Language::DeDe => "Deutsch",
        }
    }

    /// Language code (BCP 47)
    pub fn code(self) -> &'static str {
        match self {
            Language::EnUs => "en-US",
            Language::DeDe => "de-DE",
        }
    }

    /// Parse from language code
    pub fn from_code(code: &str) -> Option<Language> {
        match code {
            "en-US" | "en" => Some(Language::EnUs),
            "de-DE" | "de" => Some(Language::DeDe),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Language::EnUs => 0,
            Language::DeDe => 1,
        }
    }

    fn from_index(index: usize) -> Language {
        match index {
            1 => Language::DeDe,
            _ => Language::EnUs,
        }
    }
}

/// Receives language-change notifications
pub trait LanguageListener: Send + Sync {
    fn language_changed(&self, localizer: &Localizer);
}

/// Localization collaborator
///
/// Listeners are held weakly; a dropped listener is pruned on the next change.
pub struct Localizer {
    current: AtomicUsize,
    listeners: RwLock<Vec<Weak<dyn LanguageListener>>>,
}

impl Localizer {
    #[must_use]
    pub fn new(language: Language) -> Self {
        Self {
            current: AtomicUsize::new(language.index()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Current language
    pub fn language(&self) -> Language {
        Language::from_index(self.current.load(Ordering::Relaxed))
    }

    /// Switch language and notify every live listener
    pub fn set_language(&self, language: Language) {
        let previous = self.current.swap(language.index(), Ordering::Relaxed);
        if previous == language.index() {
            return;
        }
        log::info!(
            "Language changed to {} ({})",
            language.display_name(),
            language.code()
        );

        let live: Vec<Arc<dyn LanguageListener>> = {
            let mut listeners = self
                .listeners
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            listeners.retain(|l| l.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };
        for listener in live {
            listener.language_changed(self);
        }
    }

    /// Register a listener for language changes
    pub fn subscribe(&self, listener: &Arc<dyn LanguageListener>) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::downgrade(listener));
    }

    /// Translate `key`; unknown keys fall back to the key itself
    pub fn translate(&self, key: &str) -> String {
        let text = match self.language() {
            Language::EnUs => None,
            Language::DeDe => de_de::lookup(key),
        };
        text.unwrap_or(key).to_string()
    }

    /// Translate `key` and fill its `{{name}}` slots
    pub fn translate_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.translate(key), |text, (name, value)| {
                text.replace(&format!("{{{{{name}}}}}"), value)
            })
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(Language::default())
    }
}
