mod bvr_box;
mod bvr_detection;
mod bvr_image;
mod class_names;
mod detection_report;
mod inference_device;
mod model_config;
mod model_version;
mod pixel_array;
mod predictions;

pub use bvr_box::*;
pub use bvr_detection::*;
pub use bvr_image::*;
pub use class_names::*;
pub use detection_report::*;
pub use inference_device::*;
pub use model_config::*;
pub use model_version::*;
pub use pixel_array::*;
pub use predictions::*;
