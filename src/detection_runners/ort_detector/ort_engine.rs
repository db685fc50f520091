//! ONNX Runtime session wrapper, after https://github.com/jamjamjon/usls

use std::time::{Duration, Instant};
use anyhow::Result;
use half::{bf16, f16};
use ndarray::{Array, IxDyn};
use ort::{
    execution_providers::{
        CPUExecutionProvider, CUDAExecutionProvider, CoreMLExecutionProvider, ExecutionProvider,
        TensorRTExecutionProvider,
    },
    session::builder::{GraphOptimizationLevel, SessionBuilder},
    session::{Session, SessionInputValue},
    tensor::{PrimitiveTensorElementType, TensorElementType},
    value::{DynValue, Tensor, ValueType},
};
use crate::common::InferenceDevice;
use crate::data::{ConfigOrt, RunTimes, Stage, StageTimes, CROSS_MARK};
use crate::detection_runners::input_wrapper::X;

const TRT_CACHE_DIR: &str = "trt-cache";

/// Name, element type and dims of one model input or output. Dynamic dims are `-1`.
#[derive(Debug, Clone)]
pub struct TensorInfo {
    pub name: String,
    pub dtype: TensorElementType,
    pub dims: Vec<i64>,
}

impl TensorInfo {
    fn from_value_type(name: &str, value_type: &ValueType) -> Result<Self> {
        match value_type {
            ValueType::Tensor { ty, shape, .. } => Ok(Self {
                name: name.to_string(),
                dtype: *ty,
                dims: shape.iter().copied().collect(),
            }),
            other => anyhow::bail!("{CROSS_MARK} Unsupported non-tensor model value `{name}`: {other:?}"),
        }
    }
}

#[derive(Debug)]
pub struct OrtEngine {
    session: Session,
    device: InferenceDevice,
    inputs: Vec<TensorInfo>,
    outputs: Vec<TensorInfo>,
    fallback_width: u32,
    fallback_height: u32,
    profile: bool,
    times: RunTimes,
}

impl OrtEngine {
    pub fn new(config: &ConfigOrt) -> Result<Self> {
        if !config.ort_lib_path.is_empty() {
            if let Err(e) = ort::init_from(&config.ort_lib_path).commit() {
                log::error!("Loading onnxruntime from {} failed: {e:?}", config.ort_lib_path);
                anyhow::bail!("Failed to load onnxruntime from {}: {e}", config.ort_lib_path);
            }
        }

        let mut builder = Session::builder()?;
        let device = Self::register_device(&mut builder, config)?;

        let session = builder
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(&config.onnx_path)?;

        let inputs = session
            .inputs
            .iter()
            .map(|i| TensorInfo::from_value_type(&i.name, &i.input_type))
            .collect::<Result<Vec<_>>>()?;
        let outputs = session
            .outputs
            .iter()
            .map(|o| TensorInfo::from_value_type(&o.name, &o.output_type))
            .collect::<Result<Vec<_>>>()?;
        if inputs.is_empty() || outputs.is_empty() {
            anyhow::bail!("{CROSS_MARK} Model {} has no tensor inputs or outputs", config.onnx_path);
        }

        log::info!(
            "Backend: ONNXRuntime | Model: {} | Device: {} | Inputs: {:?} | Outputs: {:?}",
            config.onnx_path,
            device,
            inputs.iter().map(|t| (&t.name, &t.dims)).collect::<Vec<_>>(),
            outputs.iter().map(|t| (&t.name, &t.dims)).collect::<Vec<_>>(),
        );

        Ok(Self {
            session,
            device,
            inputs,
            outputs,
            fallback_width: config.model_width,
            fallback_height: config.model_height,
            profile: config.profile,
            times: RunTimes::default(),
        })
    }

    /// Registers the provider for the requested device and returns the device actually used.
    /// CUDA and CoreML fall back to the CPU; TensorRT must be available.
    fn register_device(builder: &mut SessionBuilder, config: &ConfigOrt) -> Result<InferenceDevice> {
        let requested = config.device;
        let attempt = match requested {
            InferenceDevice::TensorRT(id) => {
                let trt = TensorRTExecutionProvider::default()
                    .with_device_id(id as i32)
                    .with_fp16(config.trt_fp16_enable)
                    .with_engine_cache(config.trt_engine_cache_enable)
                    .with_engine_cache_path(TRT_CACHE_DIR);
                Self::register(builder, trt)?;
                log::info!("🐢 Initial model serialization with TensorRT may take some time...");
                return Ok(requested);
            }
            InferenceDevice::CUDA(id) => {
                Self::register(builder, CUDAExecutionProvider::default().with_device_id(id as i32))
            }
            InferenceDevice::CoreML(_) => {
                Self::register(builder, CoreMLExecutionProvider::default().with_subgraphs(false))
            }
            InferenceDevice::CPU => Ok(()),
        };

        match attempt {
            Ok(()) if requested != InferenceDevice::CPU => Ok(requested),
            Ok(()) => {
                Self::register(builder, CPUExecutionProvider::default())?;
                Ok(InferenceDevice::CPU)
            }
            Err(err) => {
                log::warn!("{err}, using cpu");
                Self::register(builder, CPUExecutionProvider::default())?;
                Ok(InferenceDevice::CPU)
            }
        }
    }

    fn register(builder: &mut SessionBuilder, ep: impl ExecutionProvider) -> Result<()> {
        if !ep.is_available()? {
            anyhow::bail!("{CROSS_MARK} {} execution provider not available", ep.name());
        }
        ep.register(builder)
            .map_err(|err| anyhow::anyhow!("{CROSS_MARK} {} initialization failed: {err:?}", ep.name()))
    }

    fn to_session_value(x: X, dtype: TensorElementType) -> Result<DynValue> {
        let x = match dtype {
            TensorElementType::Float32 => Tensor::from_array(x.into_inner())?.into_dyn(),
            TensorElementType::Float64 => Tensor::from_array(x.mapv(f64::from))?.into_dyn(),
            TensorElementType::Float16 => Tensor::from_array(x.mapv(f16::from_f32))?.into_dyn(),
            TensorElementType::Bfloat16 => Tensor::from_array(x.mapv(bf16::from_f32))?.into_dyn(),
            TensorElementType::Int32 => Tensor::from_array(x.mapv(|v| v as i32))?.into_dyn(),
            TensorElementType::Int64 => Tensor::from_array(x.mapv(|v| v as i64))?.into_dyn(),
            TensorElementType::Uint8 => Tensor::from_array(x.mapv(|v| v as u8))?.into_dyn(),
            _ => anyhow::bail!("Unsupported model input element type {dtype:?}"),
        };
        Ok(x)
    }

    fn from_session_value(x: &DynValue, dtype: TensorElementType) -> Result<Array<f32, IxDyn>> {
        fn extract<T>(x: &DynValue, to_f32: impl Fn(T) -> f32) -> Result<Array<f32, IxDyn>>
        where
            T: PrimitiveTensorElementType + Clone + 'static,
        {
            Ok(x.try_extract_array::<T>()?.mapv(to_f32))
        }
        match dtype {
            TensorElementType::Float32 => extract::<f32>(x, |v| v),
            TensorElementType::Float16 => extract::<f16>(x, f16::to_f32),
            TensorElementType::Bfloat16 => extract::<bf16>(x, bf16::to_f32),
            TensorElementType::Float64 => extract::<f64>(x, |v| v as f32),
            TensorElementType::Int64 => extract::<i64>(x, |v| v as f32),
            TensorElementType::Int32 => extract::<i32>(x, |v| v as f32),
            TensorElementType::Uint8 => extract::<u8>(x, f32::from),
            _ => anyhow::bail!("Unsupported model output element type {dtype:?}"),
        }
    }

    /// Runs the session once. Inputs are matched to the model inputs by position
    /// and outputs come back in the model's output order, all as `f32`.
    pub fn run(&mut self, xs: Vec<X>) -> Result<Vec<X>> {
        if xs.len() != self.inputs.len() {
            anyhow::bail!("Model expects {} inputs, got {}", self.inputs.len(), xs.len());
        }
        let mut times = StageTimes::default();

        let t = Instant::now();
        let mut values: Vec<SessionInputValue<'_>> = Vec::with_capacity(xs.len());
        for (info, x) in self.inputs.iter().zip(xs) {
            values.push(Self::to_session_value(x, info.dtype)?.into());
        }
        times[Stage::Align as usize] = t.elapsed();

        let t = Instant::now();
        let outputs = self.session.run(&values[..])?;
        times[Stage::Inference as usize] = t.elapsed();

        let t = Instant::now();
        let mut ys = Vec::with_capacity(self.outputs.len());
        for info in self.outputs.iter() {
            ys.push(X::from(Self::from_session_value(&outputs[info.name.as_str()], info.dtype)?));
        }
        times[Stage::Extract as usize] = t.elapsed();

        self.times.record(times);
        if self.profile {
            log::info!("[Profile] {:.3?} this run | {}", times.iter().sum::<Duration>(), self.times);
        }
        Ok(ys)
    }

    pub fn outputs(&self) -> &[TensorInfo] {
        &self.outputs
    }

    pub fn device(&self) -> &InferenceDevice {
        &self.device
    }

    /// Input height, taken from the model when it is static.
    pub fn height(&self) -> u32 {
        self.static_input_dim(2).unwrap_or(self.fallback_height)
    }

    /// Input width, taken from the model when it is static.
    pub fn width(&self) -> u32 {
        self.static_input_dim(3).unwrap_or(self.fallback_width)
    }

    fn static_input_dim(&self, i: usize) -> Option<u32> {
        match self.inputs.first().and_then(|info| info.dims.get(i)) {
            Some(&d) if d > 0 => Some(d as u32),
            _ => None,
        }
    }

    /// Custom metadata entry, e.g. `names` for Ultralytics exports.
    pub fn metadata(&self, key: &str) -> Option<String> {
        self.session.metadata().ok()?.custom(key).ok().flatten()
    }

    pub fn times(&self) -> &RunTimes {
        &self.times
    }
}
