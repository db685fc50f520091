#![allow(dead_code)]

use image::{DynamicImage, Rgb, RgbImage};
use ndarray::{array, Array1, Array2};
use parking_lot::Mutex;
use bvr_annotate::annotation::Annotator;
use bvr_annotate::common::{ClassNames, Predictions};
use bvr_annotate::data::AnnotationConfig;
use bvr_annotate::detection_runners::InferenceProcess;

/// Model stand-in returning canned predictions and recording the thresholds it was called with.
pub struct StubDetector {
    predictions: Result<Predictions, String>,
    names: ClassNames,
    pub thresholds: Mutex<Vec<f32>>,
}

impl StubDetector {
    pub fn new(predictions: Predictions, names: &[&str]) -> Self {
        Self {
            predictions: Ok(predictions),
            names: ClassNames::from(names),
            thresholds: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(Predictions::empty(), &["text", "figure"])
    }

    pub fn failing(message: &str) -> Self {
        Self {
            predictions: Err(message.to_string()),
            names: ClassNames::from(&["text", "figure"][..]),
            thresholds: Mutex::new(Vec::new()),
        }
    }

    /// One `text` box at (10, 10, 50, 50) with confidence 0.75.
    pub fn single_text_box() -> Self {
        Self::new(
            Predictions::new(array![[10.0, 10.0, 50.0, 50.0]], array![0.75], array![0.0]),
            &["text", "figure"],
        )
    }

    pub fn with_rows(xyxy: Array2<f32>, conf: Array1<f32>, cls: Array1<f32>) -> Self {
        Self::new(Predictions::new(xyxy, conf, cls), &["text", "figure"])
    }
}

impl InferenceProcess for StubDetector {
    fn infer(&self, _image: &RgbImage, conf_threshold: f32) -> anyhow::Result<Predictions> {
        self.thresholds.lock().push(conf_threshold);
        match &self.predictions {
            Ok(predictions) => Ok(predictions.clone()),
            Err(message) => Err(anyhow::anyhow!("{message}")),
        }
    }

    fn class_names(&self) -> &ClassNames {
        &self.names
    }
}

pub fn annotator() -> Annotator {
    Annotator::from_config(&AnnotationConfig::default()).unwrap()
}

/// Mid-grey 100x80 test page.
pub fn grey_image() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 80, Rgb([128, 128, 128])))
}

/// Image whose pixels all differ, so channel swaps are visible.
pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 3 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8])
    }))
}

pub fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}
