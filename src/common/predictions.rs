use anyhow::{bail, Result};
use ndarray::{Array1, Array2, Axis};
use crate::common::{BvrBox, BvrDetection};

/// Raw, position aligned output of a detection model for one image.
///
/// Row `i` of `xyxy` (pixel `x1, y1, x2, y2`), `conf[i]` and `cls[i]` describe the same candidate.
/// Nothing is validated on construction; [`Predictions::to_detections`] does that.
#[derive(Debug, Clone, PartialEq)]
pub struct Predictions {
    pub xyxy: Array2<f32>,
    pub conf: Array1<f32>,
    pub cls: Array1<f32>,
}

impl Default for Predictions {
    fn default() -> Self {
        Self::empty()
    }
}

impl Predictions {
    pub fn new(xyxy: Array2<f32>, conf: Array1<f32>, cls: Array1<f32>) -> Self {
        Self { xyxy, conf, cls }
    }

    pub fn empty() -> Self {
        Self::new(Array2::zeros((0, 4)), Array1::zeros(0), Array1::zeros(0))
    }

    /// Packs decoded detections, keeping their order.
    pub fn from_detections(detections: &[BvrDetection]) -> Self {
        let mut xyxy = Array2::zeros((detections.len(), 4));
        for (mut row, det) in xyxy.axis_iter_mut(Axis(0)).zip(detections) {
            for (dst, src) in row.iter_mut().zip(det.bbox.xyxy()) {
                *dst = src;
            }
        }
        let conf = detections.iter().map(|x| x.confidence).collect();
        let cls = detections.iter().map(|x| x.class_id as f32).collect();
        Self::new(xyxy, conf, cls)
    }

    pub fn len(&self) -> usize {
        self.conf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conf.is_empty()
    }

    /// Builds the detection set by position: i-th box, i-th confidence, i-th class id.
    pub fn to_detections(&self) -> Result<Vec<BvrDetection>> {
        if self.xyxy.ncols() != 4 {
            bail!("Expected boxes with 4 coordinates, got {}", self.xyxy.ncols());
        }
        let n = self.xyxy.nrows();
        if self.conf.len() != n || self.cls.len() != n {
            bail!(
                "Model returned {} boxes, {} confidences and {} class ids",
                n, self.conf.len(), self.cls.len()
            );
        }

        let mut detections = Vec::with_capacity(n);
        for ((row, &confidence), &cls) in self.xyxy.axis_iter(Axis(0)).zip(&self.conf).zip(&self.cls) {
            if !cls.is_finite() || cls < 0. || cls.fract() != 0. {
                bail!("Invalid class id {} returned by the model", cls);
            }
            let bbox = BvrBox::new(row[0], row[1], row[2], row[3]);
            detections.push(BvrDetection::new(cls as usize, bbox, confidence));
        }
        Ok(detections)
    }
}
