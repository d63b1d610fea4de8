//! Prediction server
//!
//! Loads the trained artifacts once and serves `GET /health` and `POST /predict`
//! over a shared, immutable [`AppState`].

mod api;
mod error;
mod handlers;
mod request;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use request::{frame_records, parse_request, Record};
pub use state::AppState;

use crate::config::AppConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Listen address
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
        }
    }
}

impl ServerConfig {
    /// Explicit values win over the environment defaults
    pub fn with_overrides(host: Option<String>, port: Option<u16>) -> Self {
        let defaults = Self::default();
        Self {
            host: host.unwrap_or(defaults.host),
            port: port.unwrap_or(defaults.port),
        }
    }
}

async fn shutdown_signal(start_time: chrono::DateTime<chrono::Utc>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install ctrl+c handler, running until killed");
        std::future::pending::<()>().await;
    }
    let uptime = chrono::Utc::now().signed_duration_since(start_time);
    info!(uptime_secs = uptime.num_seconds(), "Shutdown signal received, stopping server gracefully");
}

/// Load artifacts and serve until ctrl+c. Fails before binding if any artifact is missing.
pub async fn run_server(config: ServerConfig, app_config: AppConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();
    let state = Arc::new(AppState::load(app_config)?);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        address = %addr,
        pid = std::process::id(),
        started_at = %start_time.to_rfc3339(),
        "Server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(start_time))
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
