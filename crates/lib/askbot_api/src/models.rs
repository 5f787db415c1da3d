//! Request and response bodies.

use serde::{Deserialize, Serialize};

pub use askbot_core::relay::{ErrorBody as ErrorResponse, QuestionRequest as ChatRequest};

/// Body of `GET /api/hello`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelloWorldResponse {
    pub greeting: String,
    pub model: String,
    pub provider_configured: bool,
}
