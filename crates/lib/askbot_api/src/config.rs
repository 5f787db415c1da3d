//! API server configuration.

use askbot_core::config::{ConfigError, ProviderConfig};

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3100").
    pub bind_addr: String,
    /// Upstream completion provider settings.
    pub provider: ProviderConfig,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable    | Default          |
    /// |-------------|------------------|
    /// | `BIND_ADDR` | `127.0.0.1:3100` |
    ///
    /// Provider settings follow [`ProviderConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3100".into()),
            provider: ProviderConfig::from_env()?,
        })
    }
}
