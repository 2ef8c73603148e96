pub mod roboflow;

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{ModelId, Prediction};

pub use roboflow::RoboflowClient;

/// Hosted object detector. Implementations are built once and shared by every interaction.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Run the model on the image stored at `image` and return the raw JSON response.
    async fn infer(&self, image: &Path, model: &ModelId) -> Result<Value>;
}

/// Detector response after validation at the deserialization boundary.
#[derive(Debug, Clone)]
pub struct InferenceResponse {
    /// Untouched response body, kept for display
    pub raw: Value,
    pub predictions: Vec<Prediction>,
}

/// Largest accepted magnitude for a box center or size, in pixels.
pub const MAX_COORDINATE: f64 = (i32::MAX / 4) as f64;

#[derive(Deserialize)]
struct RawPrediction {
    class: String,
    confidence: f64,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl TryFrom<RawPrediction> for Prediction {
    type Error = String;

    fn try_from(raw: RawPrediction) -> std::result::Result<Self, Self::Error> {
        let numbers = [raw.confidence, raw.x, raw.y, raw.width, raw.height];
        if numbers.iter().any(|v| !v.is_finite()) {
            return Err("non-finite number".to_string());
        }
        if !(0.0..=1.0).contains(&raw.confidence) {
            return Err(format!("confidence {} outside [0, 1]", raw.confidence));
        }
        if raw.width <= 0.0 || raw.height <= 0.0 {
            return Err(format!("non-positive size {}x{}", raw.width, raw.height));
        }
        if [raw.x, raw.y, raw.width, raw.height]
            .iter()
            .any(|v| v.abs() > MAX_COORDINATE)
        {
            return Err(format!(
                "box ({}, {}) {}x{} out of pixel range",
                raw.x, raw.y, raw.width, raw.height
            ));
        }
        Ok(Prediction {
            class_label: raw.class,
            confidence: raw.confidence,
            center_x: raw.x,
            center_y: raw.y,
            width: raw.width,
            height: raw.height,
        })
    }
}

impl InferenceResponse {
    /// Validate a detector response. Any missing or mistyped field rejects the whole response.
    pub fn from_json(raw: Value) -> Result<Self> {
        let items = raw
            .get("predictions")
            .ok_or_else(|| Error::MalformedPrediction("missing field `predictions`".to_string()))?
            .as_array()
            .ok_or_else(|| {
                Error::MalformedPrediction("field `predictions` is not a list".to_string())
            })?;

        let predictions = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                RawPrediction::deserialize(item)
                    .map_err(|e| e.to_string())
                    .and_then(Prediction::try_from)
                    .map_err(|e| Error::MalformedPrediction(format!("prediction #{}: {e}", i + 1)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { raw, predictions })
    }
}
