use crate::models::{ConfidenceThreshold, Prediction};

/// Keep predictions whose confidence reaches the threshold, in their original order.
pub fn filter_predictions(
    predictions: &[Prediction],
    threshold: ConfidenceThreshold,
) -> Vec<Prediction> {
    predictions
        .iter()
        .filter(|p| p.confidence >= threshold.value())
        .cloned()
        .collect()
}
