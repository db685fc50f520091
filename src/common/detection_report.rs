use std::fmt;
use serde::Serialize;
use crate::common::BvrDetection;

/// Plain text summary of a detection set.
///
/// Line 0 always carries the count, followed by exactly one line per detection
/// in the order the model returned them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionReport {
    lines: Vec<String>,
}

impl DetectionReport {
    pub fn from_detections(detections: &[BvrDetection]) -> Self {
        let mut lines = Vec::with_capacity(detections.len() + 1);
        lines.push(format!("Number of detections: {}", detections.len()));
        for det in detections {
            let [x1, y1, x2, y2] = det.bbox.xyxy();
            lines.push(format!(
                "Detection: {}, Confidence: {:.2}, Coordinates: [{:?}, {:?}, {:?}, {:?}]",
                det.label(), det.confidence, x1, y1, x2, y2
            ));
        }
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of detections the report describes.
    pub fn count(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }
}

impl fmt::Display for DetectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}
