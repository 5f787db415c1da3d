//! Chat-completion provider client.
//!
//! One client, parameterised by [`ProviderConfig`], serves both shapes of
//! upstream call AskBot makes:
//!
//! - [`ProviderClient::relay_question`]: system directive + question, returns
//!   the provider's full completion object (what the relay endpoint forwards).
//! - [`Relay::ask`]: the direct variant, question only, with explicit
//!   `max_tokens` / `temperature`, returns just the reply text.
//!
//! Single shot: no retry, no backoff, no streaming.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::message::Message;
use crate::relay::{Relay, RelayError};

/// `max_tokens` sent by the direct variant when the config leaves it unset.
pub const DIRECT_MAX_TOKENS: u32 = 150;
/// `temperature` sent by the direct variant when the config leaves it unset.
pub const DIRECT_TEMPERATURE: f32 = 0.7;

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// HTTP client for an OpenAI-compatible `/v1/chat/completions` endpoint.
#[derive(Clone, Debug)]
pub struct ProviderClient {
    client: Client,
    config: ProviderConfig,
}

impl ProviderClient {
    /// Builds a client with the configured request timeout.
    pub fn new(config: ProviderConfig) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RelayError::Transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Asks for one completion of `question` behind the fixed system directive.
    ///
    /// Empty questions are forwarded as-is. The returned value is the
    /// provider's completion object, untouched.
    pub async fn relay_question(&self, question: &str) -> Result<Value, RelayError> {
        let messages = [
            Message::system(self.config.system_prompt.as_str()),
            Message::user(question),
        ];
        self.complete(&messages, self.config.max_tokens, self.config.temperature)
            .await
    }

    /// Sends `messages` and returns the raw completion object.
    pub async fn complete(
        &self,
        messages: &[Message],
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<Value, RelayError> {
        let url = self.config.completions_url();
        debug!(
            "requesting completion: model={} messages={} url={}",
            self.config.model,
            messages.len(),
            url
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&CompletionRequest {
                model: &self.config.model,
                messages,
                max_tokens,
                temperature,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(RelayError::Provider {
                status: status.as_u16(),
                message: provider_error_message(&body),
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl Relay for ProviderClient {
    async fn ask(&self, question: &str) -> Result<String, RelayError> {
        let messages = [Message::user(question)];
        let completion = self
            .complete(
                &messages,
                Some(self.config.max_tokens.unwrap_or(DIRECT_MAX_TOKENS)),
                Some(self.config.temperature.unwrap_or(DIRECT_TEMPERATURE)),
            )
            .await?;
        reply_text(&completion)
    }
}

/// Pulls `choices[0].message.content` out of a completion object.
pub fn reply_text(completion: &Value) -> Result<String, RelayError> {
    completion
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            RelayError::Malformed("completion has no choices[0].message.content".to_string())
        })
}

/// Prefers the provider's `error.message` over the raw body when present.
fn provider_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message").or(Some(e)))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}
