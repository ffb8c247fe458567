//! Login configuration
//!
//! Loaded from JSON, or from the `NANO_WALLET_ENV` environment variable for
//! the build profile alone.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Environment variable selecting the build profile
pub const PROFILE_ENV_VAR: &str = "NANO_WALLET_ENV";

/// Build profile
///
/// Development builds pre-fill the login form from the persisted developer
/// entries and may submit it automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildProfile {
    Development,
    #[default]
    Production,
}

impl BuildProfile {
    pub fn is_production(self) -> bool {
        self == BuildProfile::Production
    }

    /// Parse `development`/`dev` or `production`/`prod`
    pub fn parse(value: &str) -> CoreResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(BuildProfile::Development),
            "production" | "prod" => Ok(BuildProfile::Production),
            other => Err(CoreError::ConfigError(format!(
                "Unknown build profile: {other}"
            ))),
        }
    }
}

/// Login configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginConfig {
    pub profile: BuildProfile,
    /// BCP 47 code of the initial language
    pub language: String,
    /// Retries of idempotent peer requests
    pub peer_max_retries: u32,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            profile: BuildProfile::default(),
            language: "en-US".to_string(),
            peer_max_retries: 2,
        }
    }
}

impl LoginConfig {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::ConfigError(e.to_string()))
    }

    /// Defaults, with the profile taken from `NANO_WALLET_ENV` when set
    pub fn from_env() -> CoreResult<Self> {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(PROFILE_ENV_VAR) {
            config.profile = BuildProfile::parse(&value)?;
        }
        log::debug!("Login profile: {:?}", config.profile);
        Ok(config)
    }

    #[must_use]
    pub fn with_profile(mut self, profile: BuildProfile) -> Self {
        self.profile = profile;
        self
    }
}
