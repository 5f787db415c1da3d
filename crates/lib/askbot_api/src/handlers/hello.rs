//! Hello world endpoint: liveness check.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::models::HelloWorldResponse;

/// `GET /api/hello`: reports the core version and the configured model.
///
/// Never calls the upstream provider.
pub async fn hello_world(State(state): State<AppState>) -> Json<HelloWorldResponse> {
    let provider = &state.config.provider;
    Json(HelloWorldResponse {
        greeting: askbot_core::hello::hello_world(),
        model: provider.model.clone(),
        provider_configured: provider.validate().is_ok(),
    })
}
