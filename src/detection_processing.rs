use std::time::Instant;
use image::{DynamicImage, RgbImage};
use thiserror::Error;
use crate::annotation::Annotator;
use crate::common::{BvrDetection, BvrImage, DetectionReport, DETECTION_THRESHOLD};
use crate::detection_runners::InferenceProcess;
use crate::utils;

/// Prefix of every failure message handed to the presentation layer.
pub const ERROR_PREFIX: &str = "Error during detection: ";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    InputConversion(String),
    #[error("{0}")]
    Inference(#[from] anyhow::Error),
    #[error("class id {class_id} is not in the class name table")]
    UnknownClass { class_id: usize },
    #[error("{0}")]
    Rendering(String),
}

/// Successful pipeline output.
#[derive(Debug, Clone)]
pub struct AnnotatedDetection {
    /// Input pixels with boxes and labels drawn on, RGB.
    pub image: RgbImage,
    pub detections: Vec<BvrDetection>,
    pub report: DetectionReport,
}

/// Detects, annotates and reports on one image. The input is left untouched.
pub fn detect_and_annotate(
    model: &dyn InferenceProcess,
    annotator: &Annotator,
    image: Option<&DynamicImage>,
) -> Result<AnnotatedDetection, PipelineError> {
    let image = image.ok_or_else(|| PipelineError::InputConversion("no image was provided".to_string()))?;
    let bvr_image = BvrImage::from_dynamic(image, DETECTION_THRESHOLD)
        .map_err(|e| PipelineError::InputConversion(e.to_string()))?;
    run_pipeline(model, annotator, bvr_image)
}

/// Same as [`detect_and_annotate`] for an encoded image (PNG, JPEG, ...).
pub fn detect_and_annotate_bytes(
    model: &dyn InferenceProcess,
    annotator: &Annotator,
    bytes: &[u8],
) -> Result<AnnotatedDetection, PipelineError> {
    let bvr_image = BvrImage::decode(bytes, DETECTION_THRESHOLD)
        .map_err(|e| PipelineError::InputConversion(format!("{e:#}")))?;
    run_pipeline(model, annotator, bvr_image)
}

fn run_pipeline(
    model: &dyn InferenceProcess,
    annotator: &Annotator,
    bvr_image: BvrImage,
) -> Result<AnnotatedDetection, PipelineError> {
    let now = Instant::now();

    let predictions = model.forward(&bvr_image, bvr_image.get_threshold())?;
    let detections = resolve_labels(predictions.to_detections()?, model)?;
    log::debug!("{} detection(s) above {:.2}", detections.len(), bvr_image.get_threshold());

    let pixels = annotator.annotate(bvr_image.to_pixel_array(), &detections)?;
    let report = DetectionReport::from_detections(&detections);

    utils::trace("TIME", "Detect and annotate", now, Default::default());

    Ok(AnnotatedDetection {
        image: pixels.into_rgb(),
        detections,
        report,
    })
}

fn resolve_labels(detections: Vec<BvrDetection>, model: &dyn InferenceProcess) -> Result<Vec<BvrDetection>, PipelineError> {
    let names = model.class_names();
    detections
        .into_iter()
        .map(|detection| match names.get(detection.class_id) {
            Some(name) => Ok(detection.with_label(name)),
            None => Err(PipelineError::UnknownClass { class_id: detection.class_id }),
        })
        .collect()
}

/// Collapses a pipeline result into `(annotated image, text)`. Failures carry no image
/// and an `"Error during detection: "` message.
pub fn into_presentation(result: Result<AnnotatedDetection, PipelineError>) -> (Option<RgbImage>, String) {
    match result {
        Ok(annotated) => (Some(annotated.image), annotated.report.to_string()),
        Err(err) => {
            log::warn!("Detection failed: {err}");
            (None, format!("{ERROR_PREFIX}{err}"))
        }
    }
}
