mod utils;
pub mod common;
pub mod data;
pub mod detection_runners;
pub mod annotation;
pub mod detection_processing;
pub mod server;

use std::time::Instant;
use image::DynamicImage;
use crate::annotation::Annotator;
use crate::common::{ClassNames, ModelConfig};
use crate::data::ConfigOrt;
use crate::detection_processing::{detect_and_annotate, into_presentation};
use crate::detection_runners::{InferenceProcess, OrtYOLO};

/// Loads the ONNX model described by `model_details`, warming it up before returning.
pub fn init_detector(model_details: &ModelConfig) -> anyhow::Result<OrtYOLO> {
    let mut ort_options = ConfigOrt::from_model_config(model_details)?;
    if let Some(labels_path) = &model_details.labels_path {
        let names = ClassNames::from_labels_file(labels_path)?;
        ort_options = ort_options.with_names(names.iter().map(str::to_string).collect());
    }

    log::info!("Initializing ORT session with ({}) execution provider", model_details.inference_device);
    OrtYOLO::new(ort_options)
}

/// Runs the whole pipeline on one image and returns `(annotated image, details text)`.
pub fn run_detection(
    model: &dyn InferenceProcess,
    annotator: &Annotator,
    image: Option<&DynamicImage>,
) -> (Option<image::RgbImage>, String) {
    let now = Instant::now();
    let presented = into_presentation(detect_and_annotate(model, annotator, image));
    log::debug!("Processing time: {:?}", now.elapsed());
    presented
}
