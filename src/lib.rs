//! HTTP relay between the rockfall risk form and the external scoring service.
//!
//! The relay validates `slope`, `rainfall` and `temperature`, forwards them to the scoring
//! service, and translates the outcome into the JSON envelopes the form expects.

pub mod api;
pub mod config;
pub mod error;
pub mod scoring;

use std::sync::Arc;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub use config::RelayConfig;
pub use error::{RelayError, StartupError, ValidationError};
pub use scoring::{ScoringClient, ScoringError};

/// Shared, read-only state handed to every handler.
pub struct AppState {
    pub config: RelayConfig,
    pub scoring: ScoringClient,
}

impl AppState {
    pub fn from_config(config: RelayConfig) -> Result<Self, StartupError> {
        let scoring = ScoringClient::new(config.scoring_url.clone(), config.scoring_timeout())?;
        Ok(Self { config, scoring })
    }
}

pub fn build_app(state: Arc<AppState>) -> Router {
    api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(app: Router, config: &RelayConfig) -> Result<(), StartupError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: addr.clone(),
            source,
        })?;

    info!(%addr, scoring_url = %config.scoring_url, "relay listening");

    axum::serve(listener, app)
        .await
        .map_err(StartupError::Serve)
}
