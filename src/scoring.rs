//! Client for the external scoring service.
//!
//! The service exposes `GET /health` and `POST /predict`. Its payloads are kept as opaque JSON so
//! the relay forwards whatever the model returns without reinterpreting it.

use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tokio::time::timeout;
use tracing::debug;

use crate::api::PredictionRequest;

#[derive(Clone)]
pub struct ScoringClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("scoring service at {service} did not answer within {after:?}")]
    Timeout { service: String, after: Duration },
    #[error("failed to reach scoring service at {service}: {source}")]
    Transport {
        service: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("scoring service responded with {status}")]
    Rejected { status: StatusCode, body: Value },
}

impl ScoringError {
    /// True when no response was received at all.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, Self::Rejected { .. })
    }

    pub fn service(&self) -> Option<&str> {
        match self {
            Self::Timeout { service, .. } | Self::Transport { service, .. } => Some(service),
            Self::Rejected { .. } => None,
        }
    }
}

impl ScoringClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("rockfall-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<Value, ScoringError> {
        let url = format!("{}/health", self.base_url);
        self.exchange(self.http.get(url)).await
    }

    pub async fn predict(&self, request: &PredictionRequest) -> Result<Value, ScoringError> {
        let url = format!("{}/predict", self.base_url);
        self.exchange(self.http.post(url).json(request)).await
    }

    async fn exchange(&self, request: RequestBuilder) -> Result<Value, ScoringError> {
        let round_trip = async move {
            let response = request.send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };

        let (status, text) = timeout(self.timeout, round_trip)
            .await
            .map_err(|_| ScoringError::Timeout {
                service: self.base_url.clone(),
                after: self.timeout,
            })?
            .map_err(|source| ScoringError::Transport {
                service: self.base_url.clone(),
                source,
            })?;

        debug!(%status, bytes = text.len(), "scoring service answered");

        let body = parse_body(text);
        if !status.is_success() {
            return Err(ScoringError::Rejected { status, body });
        }

        Ok(body)
    }
}

/// Non-JSON bodies are carried along as a JSON string.
fn parse_body(text: String) -> Value {
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}
