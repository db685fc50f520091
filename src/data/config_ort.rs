//! Session and decoding options for an ONNX Runtime YOLO model.

use anyhow::Result;
use crate::common::{InferenceDevice, ModelConfig, ModelVersion};

#[derive(Debug, Clone)]
pub struct ConfigOrt {
    pub onnx_path: String,
    /// onnxruntime shared library, empty to use the one already on the library path.
    pub ort_lib_path: String,
    pub device: InferenceDevice,
    /// Fallback input size for models with dynamic spatial dims.
    pub model_width: u32,
    pub model_height: u32,
    pub profile: bool,
    pub num_dry_run: usize,

    pub trt_engine_cache_enable: bool,
    pub trt_fp16_enable: bool,

    pub iou: Option<f32>,
    /// Overrides the class names stored in the model metadata.
    pub names: Option<Vec<String>>,
    pub yolo_version: ModelVersion,
}

impl ConfigOrt {
    /// Options for the model described by a [`ModelConfig`]. Labels are not read here.
    pub fn from_model_config(model: &ModelConfig) -> Result<Self> {
        if model.weights_path.is_empty() {
            anyhow::bail!("No ONNX weights path was given");
        }
        Ok(Self {
            onnx_path: model.weights_path.clone(),
            ort_lib_path: model.ort_lib_path.clone(),
            device: model.inference_device,
            model_width: model.width,
            model_height: model.height,
            profile: model.profile,
            num_dry_run: model.num_dry_run,
            trt_engine_cache_enable: true,
            trt_fp16_enable: model.trt_fp16,
            iou: Some(model.iou_threshold),
            names: None,
            yolo_version: model.model_version,
        })
    }

    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.names = Some(names);
        self
    }
}
