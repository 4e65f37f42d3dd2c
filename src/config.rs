// Portal configuration: remote endpoints, session lifetime and payment limits

use crate::error::PortalResult;
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

pub const CONFIG_FILE: &str = "portal";
pub const ENV_PREFIX: &str = "PORTAL";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub api_base_url: String,
    pub auth_token: Option<SecretString>,
    pub timeout_ms: u64,
    pub session_ttl_seconds: u64,
    pub payment_poll_attempts: u32,
    pub payment_poll_interval_ms: u64,
    pub min_recharge_amount: f64,
    pub max_recharge_amount: f64,
    pub currency: String,
    pub transactions_page_size: u32,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            auth_token: None,
            timeout_ms: 30_000,
            session_ttl_seconds: 1800,
            payment_poll_attempts: 30,
            payment_poll_interval_ms: 1000,
            min_recharge_amount: 1.0,
            max_recharge_amount: 100_000.0,
            currency: "INR".to_string(),
            transactions_page_size: 10,
        }
    }
}

impl PortalConfig {
    /// Loads defaults, then an optional `portal.{toml,json,yaml}` file, then
    /// `PORTAL__*` environment variables (e.g. `PORTAL__API_BASE_URL`).
    pub fn load() -> PortalResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let config: PortalConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PortalResult<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(crate::PortalError::Config(
                "api_base_url must not be empty".to_string(),
            ));
        }
        if self.min_recharge_amount > self.max_recharge_amount {
            return Err(crate::PortalError::Config(format!(
                "min_recharge_amount {} exceeds max_recharge_amount {}",
                self.min_recharge_amount, self.max_recharge_amount
            )));
        }
        Ok(())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(SecretString::new(token.into()));
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_seconds)
    }

    pub fn payment_poll_interval(&self) -> Duration {
        Duration::from_millis(self.payment_poll_interval_ms)
    }
}
