pub mod config;
pub mod detection;
pub mod error;
pub mod inference;
pub mod models;
pub mod pipeline;
pub mod telemetry;

pub use config::Settings;
pub use detection::{
    Analysis, DetectionReport, OverlayRenderer, OverlayStyle, ReportEntry, analyze,
    filter_predictions, summarize,
};
pub use error::{Error, Result};
pub use inference::{InferenceClient, InferenceResponse, RoboflowClient};
pub use models::{BoundingBox, ConfidenceThreshold, Configuration, ModelId, Prediction};
pub use pipeline::{Interaction, Pipeline};

#[cfg(feature = "gui")]
pub mod gui;
