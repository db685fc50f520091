mod app_config;
mod config_ort;
mod filesystem_access;
mod time_calc;

pub use app_config::*;
pub use config_ort::ConfigOrt;
pub use filesystem_access::FsAccess;
pub use time_calc::{RunTimes, Stage, StageTimes};

pub use crate::detection_runners::ort_detector::input_wrapper::X;

pub(crate) const CROSS_MARK: &str = "❌";
