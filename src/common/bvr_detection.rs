use serde::{Deserialize, Serialize};
use crate::common::BvrBox;

/// Label used when a detection has not been matched against the class table.
const UNRESOLVED_LABEL: &str = "?";

/// One detected object.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BvrDetection {
    pub class_id: usize,
    pub bbox: BvrBox,
    /// Class name, filled in once the id has been resolved.
    pub label: Option<String>,
    pub confidence: f32,
}

impl BvrDetection {
    pub fn new(class_id: usize, bbox: BvrBox, confidence: f32) -> Self {
        Self { class_id, bbox, label: None, confidence }
    }

    pub fn with_x1y1_x2y2(self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.with_bbox(BvrBox::new(x1, y1, x2, y2))
    }

    pub fn with_bbox(mut self, bbox: BvrBox) -> Self {
        self.bbox = bbox;
        self
    }

    pub fn with_confidence(mut self, conf: f32) -> Self {
        self.confidence = conf;
        self
    }

    pub fn with_class_id(mut self, class_id: usize) -> Self {
        self.class_id = class_id;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(UNRESOLVED_LABEL)
    }

    /// `"<class name> <confidence>"` with two decimals.
    pub fn caption(&self) -> String {
        format!("{} {:.2}", self.label(), self.confidence)
    }
}
