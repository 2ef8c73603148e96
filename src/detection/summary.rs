use std::fmt;

use serde::Serialize;

use crate::models::{ConfidenceThreshold, Prediction};

/// One line of the detection report, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    /// 1-based position in the filtered list
    pub index: usize,
    pub class_label: String,
    /// e.g. `"90.0%"`
    pub confidence: String,
    /// e.g. `"40×20 px"`
    pub dimensions: String,
    /// Box center, e.g. `"(100, 100)"`
    pub position: String,
}

impl ReportEntry {
    pub fn title(&self) -> String {
        format!("Detection #{} - {} ({})", self.index, self.class_label, self.confidence)
    }
}

/// Ordered, human-readable summary of the filtered predictions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetectionReport {
    pub entries: Vec<ReportEntry>,
}

impl DetectionReport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn headline(&self) -> String {
        format!("Results: {} detection(s)", self.entries.len())
    }

    /// Message shown instead of the entries when nothing passed the threshold.
    pub fn empty_notice(threshold: ConfidenceThreshold) -> String {
        format!(
            "No detection with confidence ≥ {threshold}. Try lowering the confidence threshold."
        )
    }
}

impl fmt::Display for DetectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline())?;
        for entry in &self.entries {
            writeln!(f, "  {}", entry.title())?;
            writeln!(f, "    Class:      {}", entry.class_label)?;
            writeln!(f, "    Confidence: {}", entry.confidence)?;
            writeln!(f, "    Dimensions: {}", entry.dimensions)?;
            writeln!(f, "    Position:   {}", entry.position)?;
        }
        Ok(())
    }
}

/// Build the report for already-filtered predictions.
/// Sizes and positions are truncated to whole pixels.
pub fn summarize(predictions: &[Prediction]) -> DetectionReport {
    let entries = predictions
        .iter()
        .enumerate()
        .map(|(i, p)| ReportEntry {
            index: i + 1,
            class_label: p.class_label.clone(),
            confidence: format!("{:.1}%", p.confidence * 100.0),
            dimensions: format!("{}×{} px", p.width as i64, p.height as i64),
            position: format!("({}, {})", p.center_x as i64, p.center_y as i64),
        })
        .collect();

    DetectionReport { entries }
}
