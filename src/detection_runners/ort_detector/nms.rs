use crate::common::BvrDetection;

pub trait Nms {
    fn iou(&self, other: &Self) -> f32;
    fn confidence(&self) -> f32;
}

impl Nms for BvrDetection {
    /// Intersection over union of the two boxes, `0.0` when both are degenerate.
    fn iou(&self, other: &Self) -> f32 {
        let union = self.bbox.union(&other.bbox);
        if union <= 0.0 {
            0.0
        } else {
            self.bbox.intersect(&other.bbox) / union
        }
    }

    fn confidence(&self) -> f32 {
        self.confidence
    }
}

/// Greedy non-maximum suppression: keeps the highest scoring candidate of every
/// group overlapping by more than `iou_threshold`. Survivors are sorted by descending confidence.
pub fn nms<T: Nms>(xs: &mut Vec<T>, iou_threshold: f32) {
    xs.sort_by(|b1, b2| b2.confidence().total_cmp(&b1.confidence()));

    let mut current_index = 0;
    for index in 0..xs.len() {
        let mut drop = false;
        for prev_index in 0..current_index {
            if xs[prev_index].iou(&xs[index]) > iou_threshold {
                drop = true;
                break;
            }
        }
        if !drop {
            xs.swap(current_index, index);
            current_index += 1;
        }
    }
    xs.truncate(current_index);
}
