use crate::domain::ports::{
    ConfigProvider, ProviderSettings, DEFAULT_BIND, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::utils::error::{Result, ScoutError};
use crate::utils::validation::{validate_provider_config, Validate};
use std::env;
use std::time::Duration;

/// Configuration read from process environment variables.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub bind: String,
    pub provider: ProviderSettings,
    pub inventory_path: Option<String>,
    pub request_timeout_secs: u64,
    pub json_logs: bool,
}

impl EnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY").ok_or_else(|| ScoutError::MissingConfigError {
            field: "OPENAI_API_KEY".to_string(),
        })?;

        let mut provider = ProviderSettings::new(api_key);
        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            provider.base_url = base_url;
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            provider.model = model;
        }

        let request_timeout_secs = match lookup("SCOUT_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ScoutError::InvalidConfigValueError {
                    field: "SCOUT_REQUEST_TIMEOUT_SECS".to_string(),
                    value: raw.clone(),
                    reason: "Expected a whole number of seconds".to_string(),
                })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            bind: lookup("SCOUT_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            provider,
            inventory_path: lookup("SCOUT_INVENTORY_PATH"),
            request_timeout_secs,
            json_logs: lookup("SCOUT_LOG_FORMAT").is_some_and(|format| format == "json"),
        })
    }
}

impl ConfigProvider for EnvConfig {
    fn bind_addr(&self) -> &str {
        &self.bind
    }

    fn provider(&self) -> &ProviderSettings {
        &self.provider
    }

    fn inventory_path(&self) -> Option<&str> {
        self.inventory_path.as_deref()
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn json_logs(&self) -> bool {
        self.json_logs
    }
}

impl Validate for EnvConfig {
    fn validate(&self) -> Result<()> {
        validate_provider_config(self)?;
        tracing::debug!("Environment configuration validation passed");
        Ok(())
    }
}
