//! Network catalog
//!
//! Registry of known networks and the localized options of the network
//! selector.

use std::sync::{Arc, PoisonError, RwLock};

use crate::error::CoreResult;
use crate::i18n::{LanguageListener, Localizer};
use crate::types::{Network, NetworkCode, NetworkOption};

/// Network catalog
pub struct NetworkCatalog {
    options: RwLock<Vec<NetworkOption>>,
}

impl NetworkCatalog {
    /// Create the catalog and subscribe it to language changes
    pub fn new(localizer: &Localizer) -> Arc<Self> {
        let catalog = Arc::new(Self {
            options: RwLock::new(Self::build_options(localizer)),
        });
        let listener: Arc<dyn LanguageListener> = catalog.clone();
        localizer.subscribe(&listener);
        catalog
    }

    /// Selector options in declaration order
    pub fn list(&self) -> Vec<NetworkOption> {
        self.options
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resolve a network; `custom_address` is only used for a custom node
    pub fn resolve(&self, code: NetworkCode, custom_address: &str) -> Network {
        let address = match code.well_known_address() {
            Some(fixed) => Some(fixed.to_string()),
            None => {
                let trimmed = custom_address.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
        };
        Network {
            code,
            name: code.name().to_string(),
            address,
        }
    }

    /// Resolve a network from its raw index
    ///
    /// Fails with `InvalidNetworkCode` for an index outside the catalog.
    pub fn resolve_index(&self, index: usize, custom_address: &str) -> CoreResult<Network> {
        NetworkCode::from_index(index).map(|code| self.resolve(code, custom_address))
    }

    fn build_options(localizer: &Localizer) -> Vec<NetworkOption> {
        NetworkCode::all()
            .iter()
            .map(|code| NetworkOption {
                label: localizer.translate(code.name()),
                value: code.index(),
            })
            .collect()
    }
}

impl LanguageListener for NetworkCatalog {
    fn language_changed(&self, localizer: &Localizer) {
        *self
            .options
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Self::build_options(localizer);
    }
}
