use serde::{Deserialize, Serialize};
use crate::common::inference_device::InferenceDevice;
use crate::common::model_version::ModelVersion;

/// Confidence threshold the model is always invoked with.
pub const DETECTION_THRESHOLD: f32 = 0.50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub weights_path: String,
    /// Path to the onnxruntime shared library. Empty means `ORT_DYLIB_PATH` or the system default.
    pub ort_lib_path: String,
    /// One class name per line. Overrides the names embedded in the model metadata.
    pub labels_path: Option<String>,
    pub inference_device: InferenceDevice,
    pub model_version: ModelVersion,
    pub iou_threshold: f32,
    pub width: u32,
    pub height: u32,
    pub num_dry_run: usize,
    pub trt_fp16: bool,
    pub profile: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            weights_path: "best.onnx".to_string(),
            ort_lib_path: String::new(),
            labels_path: None,
            inference_device: InferenceDevice::CPU,
            model_version: ModelVersion::default(),
            iou_threshold: 0.45,
            width: 640,
            height: 640,
            num_dry_run: 1,
            trt_fp16: false,
            profile: false,
        }
    }
}

impl ModelConfig {
    pub fn set_device_type(&mut self, device_type: InferenceDevice) {
        self.inference_device = device_type;
    }
}

impl std::fmt::Display for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Weights File Path: {}\n\
        Labels Path: {}\n\
        OnnxRuntime Lib Path: {}\n\
        Inference Device: {:?}\n\
        Model Version: {}\n\
        Model Input Resolution: {}x{}\n\
        NMS IoU Threshold: {}",
               self.weights_path, self.labels_path.as_deref().unwrap_or("<model metadata>"),
               self.ort_lib_path, self.inference_device, self.model_version.name(),
               self.width, self.height, self.iou_threshold)
    }
}
