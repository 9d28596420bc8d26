use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// A field as the browser may send it: a JSON number, a numeric string, or something else.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
    Other(Value),
}

impl NumericInput {
    /// Finite value, if the input holds one.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
            Self::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

/// Body of `POST /api/predict` before validation. `null` counts as absent.
#[derive(Debug, Default, Deserialize)]
pub struct PredictForm {
    pub slope: Option<NumericInput>,
    pub rainfall: Option<NumericInput>,
    pub temperature: Option<NumericInput>,
}

impl PredictForm {
    /// Reads a form out of a decoded body. Anything but a JSON object is malformed.
    pub fn from_json(body: Value) -> Result<Self, ValidationError> {
        if !body.is_object() {
            return Err(ValidationError::MalformedBody(
                "expected a JSON object".to_string(),
            ));
        }
        serde_json::from_value(body).map_err(|err| ValidationError::MalformedBody(err.to_string()))
    }

    pub fn validate(self) -> Result<PredictionRequest, ValidationError> {
        let (Some(slope), Some(rainfall), Some(temperature)) =
            (self.slope, self.rainfall, self.temperature)
        else {
            return Err(ValidationError::MissingFields);
        };

        match (slope.as_f64(), rainfall.as_f64(), temperature.as_f64()) {
            (Some(slope), Some(rainfall), Some(temperature)) => Ok(PredictionRequest {
                slope,
                rainfall,
                temperature,
            }),
            (slope, rainfall, temperature) => {
                let invalid = [
                    ("slope", slope),
                    ("rainfall", rainfall),
                    ("temperature", temperature),
                ]
                .into_iter()
                .filter(|(_, value)| value.is_none())
                .map(|(name, _)| name)
                .collect();
                Err(ValidationError::NotNumeric(invalid))
            }
        }
    }
}

/// Validated body forwarded to the scoring service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub slope: f64,
    pub rainfall: f64,
    pub temperature: f64,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    pub data: Value,
    pub timestamp: String,
}

impl PredictResponse {
    pub fn new(data: Value) -> Self {
        Self {
            success: true,
            data,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Degraded,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthState,
    pub backend: &'static str,
    #[serde(rename = "pythonML")]
    pub python_ml: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    pub fn healthy(upstream: Value) -> Self {
        Self {
            status: HealthState::Healthy,
            backend: "online",
            python_ml: upstream,
            error: None,
        }
    }

    pub fn degraded(error: impl Into<String>) -> Self {
        Self {
            status: HealthState::Degraded,
            backend: "online",
            python_ml: Value::String("offline".to_string()),
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub message: &'static str,
    pub data: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct ServiceDescriptor {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub health: &'static str,
    pub predict: &'static str,
    pub history: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Upstream answered with an error status.
#[derive(Debug, Serialize)]
pub struct UpstreamErrorResponse {
    pub error: Value,
    pub details: Value,
}

/// Upstream could not be reached.
#[derive(Debug, Serialize)]
pub struct UnavailableResponse {
    pub error: String,
    pub message: String,
}
