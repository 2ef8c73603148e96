#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from ferroscan for tests
pub use ferroscan::{
    BoundingBox, ConfidenceThreshold, Configuration, DetectionReport, Error, ModelId,
    OverlayRenderer, OverlayStyle, Pipeline, Prediction,
};
