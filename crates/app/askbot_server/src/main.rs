//! AskBot relay server binary.
//!
//! Serves `POST /api/chat` (and `POST /api`) which forwards a question to the
//! configured completion provider, plus `GET /api/hello` for liveness checks.

use askbot_api::config::ApiConfig;
use askbot_core::config::normalize_base_url;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// CLI arguments for the relay server.
#[derive(Parser, Debug)]
#[command(name = "askbot_server", about = "AskBot question relay server")]
struct Args {
    /// Host to bind (overrides the host part of `BIND_ADDR`, default `127.0.0.1`).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides the port part of `BIND_ADDR`, default `3100`).
    #[arg(long)]
    port: Option<u16>,

    /// Override the completion model (otherwise `OPENAI_MODEL` or the default).
    #[arg(long)]
    model: Option<String>,

    /// Override the completion API base URL (otherwise `OPENAI_BASE_URL`).
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,askbot_api=debug,askbot_core=debug")
            }),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env()?;
    config.bind_addr = override_bind_addr(&config.bind_addr, args.host.as_deref(), args.port);
    if let Some(model) = args.model {
        config.provider.model = model;
    }
    if let Some(base_url) = args.base_url {
        config.provider.base_url = normalize_base_url(&base_url);
    }
    if let Err(e) = config.provider.validate() {
        // Keep serving: every relay call will answer 500 with the upstream reason.
        warn!(error = %e, "provider configuration incomplete");
    }

    info!(
        bind_addr = %config.bind_addr,
        model = %config.provider.model,
        base_url = %config.provider.base_url,
        "starting askbot_server"
    );

    let state = askbot_api::AppState::new(config.clone())?;
    let app = askbot_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "REST API listening");

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, shutting down");
            }
            shutdown.cancel();
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("server stopped");
    Ok(())
}

/// Replaces the host and/or port of a `host:port` bind address.
fn override_bind_addr(bind_addr: &str, host: Option<&str>, port: Option<u16>) -> String {
    let (current_host, current_port) = match bind_addr.rsplit_once(':') {
        Some((h, p)) => (h, p),
        None => (bind_addr, "3100"),
    };
    let host = match host {
        Some(h) if h.contains(':') && !h.starts_with('[') => format!("[{h}]"),
        Some(h) => h.to_string(),
        None => current_host.to_string(),
    };
    let port = port.map_or_else(|| current_port.to_string(), |p| p.to_string());
    format!("{host}:{port}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_and_port_override_bind_addr() {
        assert_eq!(override_bind_addr("127.0.0.1:3100", None, None), "127.0.0.1:3100");
        assert_eq!(
            override_bind_addr("127.0.0.1:3100", None, Some(8080)),
            "127.0.0.1:8080"
        );
        assert_eq!(
            override_bind_addr("127.0.0.1:3100", Some("0.0.0.0"), None),
            "0.0.0.0:3100"
        );
        assert_eq!(override_bind_addr("[::1]:3100", Some("::"), Some(9000)), "[::]:9000");
    }

    #[test]
    fn host_port_and_model_flags_parse() {
        let args = Args::try_parse_from([
            "askbot_server",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--model",
            "gpt-4o-mini",
        ])
        .unwrap();
        assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(args.port, Some(8080));
        assert_eq!(args.model.as_deref(), Some("gpt-4o-mini"));
    }
}
