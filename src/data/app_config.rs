use std::path::Path;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use crate::common::ModelConfig;
use crate::data::FsAccess;

pub const CONFIG_FILE_NAME: &str = "bvr_annotate.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7860,
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    pub box_thickness: u32,
    pub text_scale: f32,
    pub text_thickness: u32,
    pub text_padding: u32,
    /// TrueType font used for labels instead of the bundled one.
    pub font_path: Option<String>,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            box_thickness: 2,
            text_scale: 0.5,
            text_thickness: 1,
            text_padding: 10,
            font_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub server: ServerConfig,
    pub annotation: AnnotationConfig,
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Loads the explicit `path` if given, otherwise `bvr_annotate.json` from `<config dir>/bvr`
    /// or `~/.bvr` when present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match FsAccess::locate(CONFIG_FILE_NAME) {
                Some(path) => {
                    log::info!("Using config file {}", path.display());
                    Self::from_file(path)
                }
                None => Ok(Self::default()),
            },
        }
    }
}
