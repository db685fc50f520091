use std::path::PathBuf;
use std::sync::Arc;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use bvr_annotate::annotation::Annotator;
use bvr_annotate::common::{InferenceDevice, ModelVersion, DEVICE_NAMES, MODEL_VERSION_NAMES};
use bvr_annotate::data::AppConfig;
use bvr_annotate::init_detector;
use bvr_annotate::server::{serve, AppState};

/// Web form that runs a YOLO model on an uploaded image and returns the annotated image
/// together with a detection report.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file. Defaults to `<config dir>/bvr/bvr_annotate.json` when present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// ONNX weights
    #[arg(short, long)]
    weights: Option<String>,

    /// Class names, one per line
    #[arg(short, long)]
    labels: Option<String>,

    /// onnxruntime shared library
    #[arg(long)]
    ort_lib: Option<String>,

    /// cpu, cuda, tensorrt or coreml
    #[arg(short, long)]
    device: Option<String>,

    #[arg(long)]
    device_id: Option<usize>,

    /// yolov5 ... yolov12
    #[arg(short, long)]
    model_version: Option<String>,

    #[arg(long)]
    host: Option<String>,

    #[arg(short, long)]
    port: Option<u16>,
}

impl Cli {
    fn apply(self, config: &mut AppConfig) -> anyhow::Result<()> {
        let model = &mut config.model;
        if let Some(weights) = self.weights {
            model.weights_path = weights;
        }
        if let Some(labels) = self.labels {
            model.labels_path = Some(labels);
        }
        if let Some(ort_lib) = self.ort_lib {
            model.ort_lib_path = ort_lib;
        }
        if self.device.is_some() || self.device_id.is_some() {
            let device = self.device.as_deref().unwrap_or(model.inference_device.str_lowercase());
            let device_id = self.device_id.unwrap_or(model.inference_device.device_id());
            match InferenceDevice::from_str(device, device_id) {
                Some(device) => model.set_device_type(device),
                None => anyhow::bail!(
                    "Unknown device `{device}`, expected one of {}",
                    DEVICE_NAMES.join(", ")
                ),
            }
        }
        if let Some(version) = self.model_version {
            model.model_version = match ModelVersion::parse(&version) {
                Some(version) => version,
                None => anyhow::bail!(
                    "Unknown model version `{version}`, expected one of {}",
                    MODEL_VERSION_NAMES.join(", ")
                ),
            };
        }
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config)?;
    log::info!("{}", config.model);

    let model = tokio::task::spawn_blocking({
        let model_config = config.model.clone();
        move || init_detector(&model_config)
    })
    .await??;
    let annotator = Annotator::from_config(&config.annotation)?;

    let state = AppState::new(Arc::new(model), Arc::new(annotator));
    serve(&config.server, state).await
}
