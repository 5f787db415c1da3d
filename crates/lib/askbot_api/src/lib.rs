//! # askbot_api
//!
//! HTTP API library for AskBot.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

use askbot_core::provider::ProviderClient;
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{chat, hello};

/// Route paths.
pub mod routes {
    pub const GET_API_HELLO: &str = "/api/hello";
    pub const POST_API: &str = "/api";
    pub const POST_API_CHAT: &str = "/api/chat";
}

/// Shared application state passed to all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Upstream completion client.
    pub provider: ProviderClient,
}

impl AppState {
    /// Builds the state, constructing the provider client from `config`.
    pub fn new(config: ApiConfig) -> Result<Self, askbot_core::RelayError> {
        let provider = ProviderClient::new(config.provider.clone())?;
        Ok(Self { config, provider })
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(routes::GET_API_HELLO, get(hello::hello_world))
        .route(routes::POST_API, post(chat::chat_handler))
        .route(routes::POST_API_CHAT, post(chat::chat_handler))
        .layer(cors)
        .with_state(state)
}
