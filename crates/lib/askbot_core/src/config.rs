//! Provider and identity configuration.
//!
//! Both structs are resolved from environment variables. `from_env()` reads the
//! process environment; `from_lookup()` takes any key → value function so the
//! resolution rules can be exercised without touching global state.

use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Default completion API host.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
/// Fixed system directive prepended by the relay endpoint.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
/// Default upstream request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Settings for the upstream chat-completion provider.
///
/// | Variable              | Default                        |
/// |-----------------------|--------------------------------|
/// | `OPENAI_API_KEY`      | (required)                     |
/// | `OPENAI_BASE_URL`     | `https://api.openai.com`       |
/// | `OPENAI_MODEL`        | `gpt-3.5-turbo`                |
/// | `ASKBOT_SYSTEM_PROMPT`| `You are a helpful assistant.` |
/// | `ASKBOT_MAX_TOKENS`   | unset (provider default)       |
/// | `ASKBOT_TEMPERATURE`  | unset (provider default)       |
/// | `ASKBOT_TIMEOUT_SECS` | `60`                           |
#[derive(Clone)]
pub struct ProviderConfig {
    /// Scheme + host of the completion API, without the `/v1/...` path.
    pub base_url: String,
    /// Bearer credential.
    pub api_key: String,
    pub model: String,
    pub system_prompt: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: None,
            temperature: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// The API key must never end up in logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, applying defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_tokens = match non_empty("ASKBOT_MAX_TOKENS") {
            Some(raw) => Some(raw.trim().parse::<u32>().map_err(|e| ConfigError::Invalid {
                key: "ASKBOT_MAX_TOKENS",
                message: e.to_string(),
            })?),
            None => None,
        };
        let temperature = match non_empty("ASKBOT_TEMPERATURE") {
            Some(raw) => Some(raw.trim().parse::<f32>().map_err(|e| ConfigError::Invalid {
                key: "ASKBOT_TEMPERATURE",
                message: e.to_string(),
            })?),
            None => None,
        };
        let timeout_secs = match non_empty("ASKBOT_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: "ASKBOT_TIMEOUT_SECS",
                message: e.to_string(),
            })?,
            None => defaults.timeout_secs,
        };

        Ok(Self {
            base_url: non_empty("OPENAI_BASE_URL")
                .map(|u| normalize_base_url(&u))
                .unwrap_or(defaults.base_url),
            api_key: non_empty("OPENAI_API_KEY").unwrap_or_default(),
            model: non_empty("OPENAI_MODEL").unwrap_or(defaults.model),
            system_prompt: non_empty("ASKBOT_SYSTEM_PROMPT").unwrap_or(defaults.system_prompt),
            max_tokens,
            temperature,
            timeout_secs,
        })
    }

    /// Checks that the settings can be used for an upstream call.
    ///
    /// The base URL must parse and use HTTPS, except for loopback hosts used
    /// in development and tests. The API key must be present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.base_url).map_err(|e| ConfigError::Invalid {
            key: "OPENAI_BASE_URL",
            message: e.to_string(),
        })?;
        let host = parsed.host_str().unwrap_or("");
        let is_loopback = matches!(host, "localhost" | "127.0.0.1" | "[::1]" | "::1");
        if parsed.scheme() != "https" && !is_loopback {
            return Err(ConfigError::Invalid {
                key: "OPENAI_BASE_URL",
                message: "must use HTTPS or a loopback host".into(),
            });
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("OPENAI_API_KEY"));
        }
        if let Some(t) = self.temperature
            && !(0.0..=2.0).contains(&t)
        {
            return Err(ConfigError::Invalid {
                key: "ASKBOT_TEMPERATURE",
                message: format!("{t} is outside 0.0..=2.0"),
            });
        }
        Ok(())
    }

    /// Full URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", normalize_base_url(&self.base_url))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Opaque identity-provider project settings.
///
/// AskBot never interprets these beyond checking whether they are present;
/// they are handed to the identity collaborator as-is.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct IdentityConfig {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
}

impl fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("configured", &self.is_configured())
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

impl IdentityConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            api_key: get("ASKBOT_IDENTITY_API_KEY"),
            auth_domain: get("ASKBOT_IDENTITY_AUTH_DOMAIN"),
            project_id: get("ASKBOT_IDENTITY_PROJECT_ID"),
            storage_bucket: get("ASKBOT_IDENTITY_STORAGE_BUCKET"),
            messaging_sender_id: get("ASKBOT_IDENTITY_MESSAGING_SENDER_ID"),
            app_id: get("ASKBOT_IDENTITY_APP_ID"),
        }
    }

    /// True when the minimum settings for a hosted identity project are set.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.project_id.is_some()
    }
}

/// Reduces a provider URL to scheme + host.
///
/// `OPENAI_BASE_URL` is commonly set to `https://api.openai.com/v1`; the
/// trailing `/v1` is dropped so the path is not doubled.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    trimmed
        .strip_suffix("/v1")
        .unwrap_or(trimmed)
        .trim_end_matches('/')
        .to_string()
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let config = ProviderConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert!(config.api_key.is_empty());
        assert!(config.max_tokens.is_none());
        assert!(config.temperature.is_none());
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn env_values_override_defaults() {
        let config = ProviderConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:9000/"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("ASKBOT_MAX_TOKENS", "256"),
            ("ASKBOT_TEMPERATURE", "0.2"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, Some(256));
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(
            config.completions_url(),
            "http://localhost:9000/v1/chat/completions"
        );
    }

    #[test]
    fn versioned_base_url_is_not_doubled() {
        let config = ProviderConfig::from_lookup(lookup_from(&[(
            "OPENAI_BASE_URL",
            "https://api.openai.com/v1",
        )]))
        .unwrap();
        assert_eq!(config.base_url, "https://api.openai.com");
        assert_eq!(
            config.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );

        let config = ProviderConfig::from_lookup(lookup_from(&[(
            "OPENAI_BASE_URL",
            "http://localhost:9000/v1/",
        )]))
        .unwrap();
        assert_eq!(
            config.completions_url(),
            "http://localhost:9000/v1/chat/completions"
        );
    }

    #[test]
    fn unparsable_numbers_are_reported() {
        let err = ProviderConfig::from_lookup(lookup_from(&[("ASKBOT_MAX_TOKENS", "lots")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "ASKBOT_MAX_TOKENS",
                ..
            }
        ));
    }

    #[test]
    fn validate_requires_api_key() {
        let config = ProviderConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("OPENAI_API_KEY"))
        ));
    }

    #[test]
    fn validate_rejects_plain_http_remote_hosts() {
        let config = ProviderConfig {
            base_url: "http://api.example.com".into(),
            api_key: "sk".into(),
            ..ProviderConfig::default()
        };
        assert!(config.validate().is_err());

        let local = ProviderConfig {
            base_url: "http://127.0.0.1:8080".into(),
            api_key: "sk".into(),
            ..ProviderConfig::default()
        };
        assert!(local.validate().is_ok());
    }

    #[test]
    fn debug_output_hides_api_key() {
        let config = ProviderConfig {
            api_key: "sk-very-secret".into(),
            ..ProviderConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn identity_config_is_opaque() {
        let identity = IdentityConfig::from_lookup(lookup_from(&[
            ("ASKBOT_IDENTITY_API_KEY", "AIza-secret"),
            ("ASKBOT_IDENTITY_PROJECT_ID", "askbot-dev"),
        ]));
        assert!(identity.is_configured());
        let rendered = format!("{identity:?}");
        assert!(!rendered.contains("AIza-secret"));
        assert!(rendered.contains("askbot-dev"));

        assert!(!IdentityConfig::from_lookup(lookup_from(&[])).is_configured());
    }
}
