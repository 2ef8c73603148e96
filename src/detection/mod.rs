pub mod filter;
pub mod font;
pub mod overlay;
pub mod summary;

use image::RgbImage;
use tracing::debug;

use crate::models::{ConfidenceThreshold, Prediction};

pub use filter::filter_predictions;
pub use overlay::{OverlayRenderer, OverlayStyle};
pub use summary::{summarize, DetectionReport, ReportEntry};

/// Result of one filter → render → summarize pass.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub threshold: ConfidenceThreshold,
    pub filtered: Vec<Prediction>,
    pub annotated: RgbImage,
    pub report: DetectionReport,
}

/// Run the local part of an interaction over predictions that were already validated.
pub fn analyze(
    renderer: &OverlayRenderer,
    image: &RgbImage,
    predictions: &[Prediction],
    threshold: ConfidenceThreshold,
) -> Analysis {
    let filtered = filter_predictions(predictions, threshold);
    debug!(
        total = predictions.len(),
        kept = filtered.len(),
        %threshold,
        "filtered predictions"
    );

    let annotated = renderer.render(image, &filtered);
    let report = summarize(&filtered);

    Analysis {
        threshold,
        filtered,
        annotated,
        report,
    }
}
