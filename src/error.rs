use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use thiserror::Error;

use crate::api::{ErrorResponse, UnavailableResponse, UpstreamErrorResponse};
use crate::scoring::ScoringError;

/// Shown to clients whenever the scoring service cannot be reached.
pub const UNAVAILABLE_MESSAGE: &str = "Python ML service unavailable";

const DEFAULT_PREDICTION_ERROR: &str = "Prediction failed";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields: slope, rainfall, temperature")]
    MissingFields,
    #[error("Fields must be numeric: {}", .0.join(", "))]
    NotNumeric(Vec<&'static str>),
    #[error("Invalid JSON body: {0}")]
    MalformedBody(String),
}

/// Every failure a relay handler can end with.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(err) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response(),
            Self::Scoring(ScoringError::Rejected { status, body }) => {
                let error = body
                    .get("error")
                    .filter(|value| is_present(value))
                    .cloned()
                    .unwrap_or_else(|| Value::from(DEFAULT_PREDICTION_ERROR));
                (
                    status,
                    Json(UpstreamErrorResponse {
                        error,
                        details: body,
                    }),
                )
                    .into_response()
            }
            Self::Scoring(err) => {
                let service = err.service().unwrap_or("its configured address");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(UnavailableResponse {
                        error: UNAVAILABLE_MESSAGE.to_string(),
                        message: format!("Please ensure the scoring service is running at {service}"),
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// Null, `false`, zero and empty strings carry no message.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Fatal errors raised while bringing the relay up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build scoring client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server failed: {0}")]
    Serve(#[source] std::io::Error),
}
