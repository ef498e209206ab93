use crate::types::{PredictionLabel, PredictionRequest};
use serde_json::Value;
use thiserror::Error;

/// Rejections raised before anything is sent to the prediction service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid JSON format: {0}")]
    MalformedInput(String),

    #[error("Invalid prediction value. Must be 'Exoplanet' or 'Not Exoplanet'")]
    InvalidPredictionValue,

    #[error("Confidence must be a number between 0 and 1")]
    InvalidConfidenceRange,
}

/// Parses user-entered text into a [`PredictionRequest`].
///
/// Only `prediction` and `confidence` are checked. The other fields are taken
/// as entered, subject to JSON type checking.
pub fn validate(raw_text: &str) -> Result<PredictionRequest, ValidationError> {
    let parsed: Value = serde_json::from_str(raw_text)
        .map_err(|e| ValidationError::MalformedInput(e.to_string()))?;

    check_prediction(&parsed)?;
    check_confidence(&parsed)?;

    serde_json::from_value(parsed).map_err(|e| ValidationError::MalformedInput(e.to_string()))
}

fn check_prediction(parsed: &Value) -> Result<PredictionLabel, ValidationError> {
    parsed
        .get("prediction")
        .and_then(Value::as_str)
        .and_then(PredictionLabel::from_literal)
        .ok_or(ValidationError::InvalidPredictionValue)
}

fn check_confidence(parsed: &Value) -> Result<f64, ValidationError> {
    match parsed.get("confidence").and_then(Value::as_f64) {
        Some(confidence) if (0.0..=1.0).contains(&confidence) => Ok(confidence),
        _ => Err(ValidationError::InvalidConfidenceRange),
    }
}
