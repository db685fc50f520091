use serde::{Deserialize, Serialize};

/// Execution provider the ONNX Runtime session is built with.
///
/// Serialized as `"cpu"`, `"cuda:0"`, `"tensorrt:1"`, `"coreml"`. A missing device id means 0.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum InferenceDevice {
    #[default] CPU,
    CUDA(usize),
    TensorRT(usize),
    CoreML(usize),
}

/// Accepted device names, lowercase.
pub const DEVICE_NAMES: [&str; 4] = ["cpu", "cuda", "tensorrt", "coreml"];

impl InferenceDevice {
    /// Parses a device name, case-insensitive. `device_id` is ignored for the CPU.
    pub fn from_str(device: &str, device_id: usize) -> Option<Self> {
        match device.to_lowercase().as_str() {
            "cpu" => Some(InferenceDevice::CPU),
            "cuda" => Some(InferenceDevice::CUDA(device_id)),
            "tensorrt" => Some(InferenceDevice::TensorRT(device_id)),
            "coreml" => Some(InferenceDevice::CoreML(device_id)),
            _ => None,
        }
    }

    /// Display name, e.g. `TensorRT`.
    pub fn str(&self) -> &'static str {
        match self {
            InferenceDevice::CPU => "CPU",
            InferenceDevice::CUDA(_) => "CUDA",
            InferenceDevice::TensorRT(_) => "TensorRT",
            InferenceDevice::CoreML(_) => "CoreML",
        }
    }

    pub fn str_lowercase(&self) -> &'static str {
        match self {
            InferenceDevice::CPU => DEVICE_NAMES[0],
            InferenceDevice::CUDA(_) => DEVICE_NAMES[1],
            InferenceDevice::TensorRT(_) => DEVICE_NAMES[2],
            InferenceDevice::CoreML(_) => DEVICE_NAMES[3],
        }
    }

    pub fn device_id(&self) -> usize {
        match self {
            InferenceDevice::CPU => 0,
            InferenceDevice::CUDA(id) | InferenceDevice::TensorRT(id) | InferenceDevice::CoreML(id) => *id,
        }
    }
}

impl TryFrom<String> for InferenceDevice {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let (name, id) = match value.split_once(':') {
            Some((name, id)) => {
                let id = id.trim().parse::<usize>()
                    .map_err(|_| format!("Invalid device id in '{}'", value))?;
                (name, id)
            }
            None => (value.as_str(), 0),
        };
        InferenceDevice::from_str(name.trim(), id).ok_or_else(|| format!(
            "Unknown inference device '{}', expected one of: {}",
            value,
            DEVICE_NAMES.join(", ")
        ))
    }
}

impl From<InferenceDevice> for String {
    fn from(device: InferenceDevice) -> Self {
        match device {
            InferenceDevice::CPU => DEVICE_NAMES[0].to_string(),
            other => format!("{}:{}", other.str_lowercase(), other.device_id()),
        }
    }
}

impl std::fmt::Display for InferenceDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.str())
    }
}
