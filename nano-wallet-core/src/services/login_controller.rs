//! Login form controller
//!
//! Sole writer of `FormState`.

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::{CredentialValidator, NetworkCatalog};
use crate::types::{FormState, LoginField, LoginSubmission, NetworkCode};

/// Login form controller
pub struct LoginFormController {
    state: FormState,
    validator: Arc<CredentialValidator>,
    catalog: Arc<NetworkCatalog>,
}

impl LoginFormController {
    #[must_use]
    pub fn new(validator: Arc<CredentialValidator>, catalog: Arc<NetworkCatalog>) -> Self {
        Self {
            state: FormState::default(),
            validator,
            catalog,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Apply an edit of one field
    ///
    /// `external_error` is the passphrase input's own error message; other
    /// fields ignore it. A network value outside the catalog fails with
    /// `InvalidNetworkCode` and leaves the form untouched.
    pub fn on_field_change(
        &mut self,
        field: LoginField,
        value: &str,
        external_error: Option<&str>,
    ) -> CoreResult<()> {
        match field {
            LoginField::Address => {
                let result = self.validator.validate_address(value);
                self.state.address = result.address;
                self.state.address_validity = result.address_validity;
            }
            LoginField::Passphrase => {
                let result = self.validator.validate_passphrase(value, external_error);
                self.state.passphrase = result.passphrase;
                self.state.passphrase_validity = result.passphrase_validity;
            }
            LoginField::Network => {
                self.state.selected_network = NetworkCode::parse(value)?;
            }
        }
        Ok(())
    }

    /// Restore remembered values into the form
    ///
    /// The address is validated as if typed. A `None` passphrase leaves the
    /// passphrase field as is.
    pub fn prefill(&mut self, network: NetworkCode, address: &str, passphrase: Option<&str>) {
        self.state.selected_network = network;
        let result = self.validator.validate_address(address);
        self.state.address = result.address;
        self.state.address_validity = result.address_validity;
        if let Some(passphrase) = passphrase {
            let result = self.validator.validate_passphrase(passphrase, None);
            self.state.passphrase = result.passphrase;
            self.state.passphrase_validity = result.passphrase_validity;
        }
    }

    /// Whether the submit control is enabled
    pub fn can_submit(&self) -> bool {
        let s = &self.state;
        !s.passphrase.is_empty()
            && s.passphrase_validity.is_empty()
            && (s.selected_network != NetworkCode::CustomNode || s.address_validity.is_empty())
    }

    /// Payload of a submission with the form's passphrase
    pub fn submission(&self) -> CoreResult<LoginSubmission> {
        if !self.can_submit() {
            return Err(CoreError::ValidationError(
                "Login form is not submittable".to_string(),
            ));
        }
        Ok(self.submission_with(&self.state.passphrase))
    }

    /// Payload for an arbitrary passphrase and the form's network
    pub fn submission_with(&self, passphrase: &str) -> LoginSubmission {
        LoginSubmission {
            passphrase: passphrase.to_string(),
            network: self
                .catalog
                .resolve(self.state.selected_network, &self.state.address),
        }
    }
}
