//! Question relay handler.
//!
//! Forwards `{ "question": ... }` to the completion provider behind the fixed
//! system directive and returns the provider's completion object unchanged.
//! Stateless and single-shot: no retry, no cache, no streaming.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use tracing::{debug, instrument};

use crate::AppState;
use crate::error::AppResult;
use crate::models::ChatRequest;

/// `POST /api/chat` (also `POST /api`): relay one question.
///
/// `200` with the completion JSON on success, `500` with `{ "error" }` on any
/// failure. The body is parsed as JSON whatever its `Content-Type`; empty
/// questions are forwarded, not rejected.
#[instrument(skip_all, fields(question_len = tracing::field::Empty))]
pub async fn chat_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<serde_json::Value>> {
    let request: ChatRequest = serde_json::from_slice(&body)?;
    tracing::Span::current().record("question_len", request.question.len());

    let completion = state.provider.relay_question(&request.question).await?;
    debug!("completion relayed");
    Ok(Json(completion))
}
