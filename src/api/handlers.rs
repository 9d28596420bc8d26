use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::{RelayError, ValidationError, UNAVAILABLE_MESSAGE};
use crate::AppState;

use super::models::{
    Endpoints, ErrorResponse, HealthResponse, HistoryResponse, PredictForm, PredictResponse,
    ServiceDescriptor,
};

pub async fn root() -> Json<ServiceDescriptor> {
    Json(ServiceDescriptor {
        service: "Rockfall Prediction API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            health: "GET /api/health",
            predict: "POST /api/predict",
            history: "GET /api/history",
        },
    })
}

pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    match state.scoring.health().await {
        Ok(upstream) => (StatusCode::OK, Json(HealthResponse::healthy(upstream))),
        Err(err) => {
            warn!(error = %err, "scoring service health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::degraded(UNAVAILABLE_MESSAGE)),
            )
        }
    }
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictResponse>, RelayError> {
    let Json(body) =
        payload.map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()))?;
    let form = PredictForm::from_json(body)?;

    let request = form.validate().inspect_err(|err| {
        warn!(error = %err, "rejected prediction request");
    })?;

    info!(
        slope = request.slope,
        rainfall = request.rainfall,
        temperature = request.temperature,
        scoring_url = %state.scoring.base_url(),
        "forwarding prediction request"
    );

    match state.scoring.predict(&request).await {
        Ok(data) => {
            let risk_level = data
                .get("risk_level")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            info!(risk_level, "prediction received");
            Ok(Json(PredictResponse::new(data)))
        }
        Err(err) if err.is_unavailable() => {
            error!(error = %err, "scoring service unreachable");
            Err(err.into())
        }
        Err(err) => {
            warn!(error = %err, "scoring service rejected prediction");
            Err(err.into())
        }
    }
}

pub async fn history() -> Json<HistoryResponse> {
    Json(HistoryResponse {
        message: "History feature coming soon",
        data: Vec::new(),
    })
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not found".to_string(),
        }),
    )
        .into_response()
}
