use std::time::Instant;
use image::RgbImage;
use crate::common::{ClassNames, Predictions};
use crate::utils;

/// A loaded detection model as seen by the annotation pipeline.
///
/// Implementations are built once at startup and shared read-only between requests.
pub trait InferenceProcess: Send + Sync {
    /// Runs the model on an RGB image, returning only candidates with confidence `>= conf_threshold`.
    /// Boxes are `x1, y1, x2, y2` in pixels of `image`.
    fn infer(&self, image: &RgbImage, conf_threshold: f32) -> anyhow::Result<Predictions>;

    /// Class index to name table of the loaded model.
    fn class_names(&self) -> &ClassNames;

    /// Same as [`InferenceProcess::infer`], tracing how long it took.
    fn forward(&self, image: &RgbImage, conf_threshold: f32) -> anyhow::Result<Predictions> {
        let detect_time = Instant::now();
        let ys = self.infer(image, conf_threshold)?;
        utils::trace("TIME", "Inference", detect_time, Default::default());
        Ok(ys)
    }
}
