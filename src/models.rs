use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single detection returned by the hosted model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub class_label: String,
    pub confidence: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Prediction {
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::from_prediction(self)
    }

    /// Text drawn above the box, e.g. `"ink 0.90"`
    pub fn label(&self) -> String {
        format!("{} {:.2}", self.class_label, self.confidence)
    }
}

/// Axis-aligned box in pixel coordinates. Corners may lie outside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub fn from_prediction(p: &Prediction) -> Self {
        let half_w = p.width / 2.0;
        let half_h = p.height / 2.0;
        // `as` truncates toward zero and saturates at the i32 limits
        Self {
            x1: (p.center_x - half_w) as i32,
            y1: (p.center_y - half_h) as i32,
            x2: (p.center_x + half_w) as i32,
            y2: (p.center_y + half_h) as i32,
        }
    }

    pub fn width(&self) -> i32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> i32 {
        self.y2.saturating_sub(self.y1)
    }
}

/// Roboflow model reference in `project/version` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Minimum confidence for a prediction to be displayed, always within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct ConfidenceThreshold(f64);

impl ConfidenceThreshold {
    pub const DEFAULT: ConfidenceThreshold = ConfidenceThreshold(0.39);
    pub const STEP: f64 = 0.01;

    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::Config(format!(
                "confidence threshold must be within [0, 1], got {value}"
            )))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for ConfidenceThreshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ConfidenceThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Per-interaction settings chosen in the UI or on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub model_id: ModelId,
    pub confidence_threshold: ConfidenceThreshold,
}
