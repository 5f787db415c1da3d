//! The relay seam between a conversation view and whatever answers questions.
//!
//! A [`Relay`] turns one question into one reply text. Two implementations
//! ship with the crate:
//!
//! - [`crate::provider::ProviderClient`]: calls the completion API directly.
//! - [`HttpRelay`]: posts `{ "question": ... }` to a running relay endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::provider;

/// Failures while obtaining a reply.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The request never produced an HTTP response (DNS, connect, timeout, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The upstream answered with a non-success status.
    #[error("Provider error {status}: {message}")]
    Provider { status: u16, message: String },

    /// The upstream answered 2xx but the body lacked the expected fields.
    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RelayError::Malformed(e.to_string())
        } else {
            RelayError::Transport(e.to_string())
        }
    }
}

/// Anything that can answer a single question.
#[async_trait]
pub trait Relay: Send + Sync {
    /// Returns the assistant's reply text for `question`.
    async fn ask(&self, question: &str) -> Result<String, RelayError>;
}

/// Inbound envelope of the relay endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionRequest {
    /// Forwarded verbatim; a missing field is treated as empty text.
    #[serde(default)]
    pub question: String,
}

/// Failure envelope of the relay endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Client for a remote relay endpoint (`POST /api/chat`).
#[derive(Clone, Debug)]
pub struct HttpRelay {
    client: Client,
    endpoint: String,
}

impl HttpRelay {
    /// `endpoint` is the full URL of the relay route, e.g.
    /// `http://127.0.0.1:3100/api/chat`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Relay for HttpRelay {
    async fn ask(&self, question: &str) -> Result<String, RelayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&QuestionRequest {
                question: question.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(RelayError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let completion: serde_json::Value = response.json().await?;
        provider::reply_text(&completion)
    }
}
