mod handlers;
mod models;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub use handlers::{health, history, not_found, predict, root};
pub use models::{
    Endpoints, ErrorResponse, HealthResponse, HealthState, HistoryResponse, NumericInput,
    PredictForm, PredictResponse, PredictionRequest, ServiceDescriptor, UnavailableResponse,
    UpstreamErrorResponse,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/predict", post(predict))
        .route("/api/history", get(history))
        .fallback(not_found)
        .with_state(state)
}
