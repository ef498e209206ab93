use crate::types::{PredictionRequest, PredictionResponse};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

pub const PREDICT_PATH: &str = "/predict/";

/// Failures reported after a payload has been handed to the prediction service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Network error: Failed to connect to API")]
    NetworkError,

    #[error("{message}")]
    HttpError { status: u16, message: String },

    #[error("API Error: {0}")]
    ApiError(String),

    #[error("Invalid response from API: {0}")]
    InvalidResponse(String),
}

/// Posts prediction payloads to `{base_url}/predict/`.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: Client,
    endpoint: String,
}

impl PredictionClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), PREDICT_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one POST and classifies the outcome. The body is always read and
    /// parsed, since error statuses may still carry an `error` message.
    pub async fn submit(
        &self,
        payload: &PredictionRequest,
    ) -> Result<PredictionResponse, SubmissionError> {
        log::debug!(
            "POST {} ({} for {:.3})",
            self.endpoint,
            payload.prediction,
            payload.confidence
        );

        let response = match self.http.post(&self.endpoint).json(payload).send().await {
            Ok(response) => response,
            Err(e) => {
                log::error!("Failed to reach prediction service at {}: {e}", self.endpoint);
                return Err(SubmissionError::NetworkError);
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                log::error!("Failed to read prediction service response: {e}");
                return Err(SubmissionError::NetworkError);
            }
        };

        classify(status, &body)
    }
}

fn classify(status: StatusCode, body: &str) -> Result<PredictionResponse, SubmissionError> {
    let parsed = serde_json::from_str::<Value>(body);

    if !status.is_success() {
        let message = parsed
            .ok()
            .as_ref()
            .and_then(|json| json.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}: Request failed", status.as_u16()));
        log::warn!("Prediction service returned {status}: {message}");
        return Err(SubmissionError::HttpError {
            status: status.as_u16(),
            message,
        });
    }

    let json = parsed.map_err(|e| {
        log::warn!("Prediction service returned a non-JSON body: {e}");
        SubmissionError::InvalidResponse(e.to_string())
    })?;

    match json.get("error") {
        None | Some(Value::Null) => {}
        Some(Value::String(message)) => {
            log::warn!("Prediction service reported an error: {message}");
            return Err(SubmissionError::ApiError(message.clone()));
        }
        Some(other) => {
            log::warn!("Prediction service reported an error: {other}");
            return Err(SubmissionError::ApiError(other.to_string()));
        }
    }

    serde_json::from_value(json).map_err(|e| {
        log::warn!("Prediction service response did not match the expected shape: {e}");
        SubmissionError::InvalidResponse(e.to_string())
    })
}
