use std::sync::Arc;

use rockfall_relay::{build_app, run_server, AppState, RelayConfig, StartupError};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "rockfall_relay=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = RelayConfig::load();
    info!(
        port = config.port,
        scoring_url = %config.scoring_url,
        timeout_ms = config.scoring_timeout_ms,
        "starting rockfall relay"
    );

    let state = Arc::new(AppState::from_config(config.clone())?);
    let app = build_app(state);

    run_server(app, &config).await
}
