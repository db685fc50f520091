//! File/code adapted from https://github.com/jamjamjon/usls

use anyhow::Result;
use image::RgbImage;
use ndarray::{ArrayView, Axis, IxDyn};
use parking_lot::Mutex;
use rayon::prelude::*;

use crate::common::{BoxType, BvrBox, BvrDetection, ClassNames, ClssType, ModelVersion, Predictions, YoloPreds};
use crate::data::{ConfigOrt, CROSS_MARK, X};
use crate::detection_runners::image_ops;
use crate::detection_runners::inference_process::InferenceProcess;
use crate::detection_runners::nms::nms;
use crate::detection_runners::ort_detector::OrtEngine;

/// Geometry and thresholds needed to turn raw head output into detections.
#[derive(Debug, Clone, Copy)]
pub struct DecodeParams {
    /// Letterbox scale factor, model pixels per image pixel.
    pub ratio: f32,
    pub image_width: u32,
    pub image_height: u32,
    pub conf_threshold: f32,
    pub iou_threshold: f32,
}

/// A YOLO detection model running on ONNX Runtime.
#[derive(Debug)]
pub struct OrtYOLO {
    engine: Mutex<OrtEngine>,
    nc: usize,
    height: u32,
    width: u32,
    iou: f32,
    names: ClassNames,
    layout: YoloPreds,
    version: ModelVersion,
}

impl OrtYOLO {
    pub fn new(options: ConfigOrt) -> Result<Self> {
        let engine = OrtEngine::new(&options)?;
        let (height, width) = (engine.height(), engine.width());

        // YOLO Outputs Format
        let version = options.yolo_version;
        let layout = version.layout();

        // Class names: user-defined.or(parsed)
        let names_parsed = engine.metadata("names").and_then(|names| ClassNames::from_metadata(&names));
        let names = match ClassNames::reconcile(options.names, names_parsed)? {
            Some(names) => names,
            None => {
                let row_len = Self::row_len_from_output(&engine, &layout);
                match row_len.map(|n| layout.nc_from_row_len(n)) {
                    Some(nc) if nc > 0 => ClassNames::placeholders(nc),
                    _ => anyhow::bail!(
                        "{CROSS_MARK} Unable to obtain the number of classes. Provide a labels file or a model exported with `names` metadata."
                    ),
                }
            }
        };
        let nc = names.len();
        let iou = options.iou.unwrap_or(0.45);

        // Summary
        log::info!(
            "YOLO Version: {} | Classes: {} | Input: {}x{} | Device: {}",
            version.name(),
            nc,
            width,
            height,
            engine.device(),
        );

        let yolo = Self {
            engine: Mutex::new(engine),
            nc,
            height,
            width,
            iou,
            names,
            layout,
            version,
        };

        for _ in 0..options.num_dry_run {
            let blank = X::zeros(&[1, 3, height as usize, width as usize]);
            yolo.engine.lock().run(vec![blank])?;
        }
        if options.num_dry_run > 0 {
            log::info!("Warm-up finished: {}", yolo.engine.lock().times());
        }

        Ok(yolo)
    }

    fn row_len_from_output(engine: &OrtEngine, layout: &YoloPreds) -> Option<usize> {
        let dims = &engine.outputs().first()?.dims;
        if dims.len() != 3 {
            return None;
        }
        let d = if layout.is_anchors_first() { dims[2] } else { dims[1] };
        if d > 0 { Some(d as usize) } else { None }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn nc(&self) -> usize {
        self.nc
    }

    pub fn version(&self) -> &ModelVersion {
        &self.version
    }

    pub fn layout(&self) -> &YoloPreds {
        &self.layout
    }
}

impl InferenceProcess for OrtYOLO {
    fn infer(&self, image: &RgbImage, conf_threshold: f32) -> Result<Predictions> {
        let (x, ratio) = image_ops::preprocess(image, self.width, self.height)?;

        let ys = self.engine.lock().run(vec![x])?;
        let output = match ys.first() {
            Some(y) => y,
            None => anyhow::bail!("Model produced no outputs"),
        };
        if output.ndim() != 3 || output.shape()[0] == 0 {
            anyhow::bail!("Unexpected model output shape {:?}", output.shape());
        }

        let params = DecodeParams {
            ratio,
            image_width: image.width(),
            image_height: image.height(),
            conf_threshold,
            iou_threshold: self.iou,
        };
        let preds = output.index_axis(Axis(0), 0);
        let detections = decode_predictions(preds, &self.layout, self.nc, &params)?;

        Ok(Predictions::from_detections(&detections))
    }

    fn class_names(&self) -> &ClassNames {
        &self.names
    }
}

/// Decodes one image's head output (`[anchors, values]` or `[values, anchors]`, see `layout`)
/// into detections in original image pixels.
///
/// Candidates below `conf_threshold` are dropped, boxes are clipped to the image and
/// NMS is applied when the layout asks for it.
pub fn decode_predictions(
    preds: ArrayView<f32, IxDyn>,
    layout: &YoloPreds,
    nc: usize,
    params: &DecodeParams,
) -> Result<Vec<BvrDetection>> {
    if preds.ndim() != 2 {
        anyhow::bail!("Expected 2D predictions, got shape {:?}", preds.shape());
    }
    let row_len = if layout.is_anchors_first() { preds.shape()[1] } else { preds.shape()[0] };
    let fits = match layout.clss {
        ClssType::ConfCls => row_len >= 6,
        _ => nc > 0 && layout.nc_from_row_len(row_len) == nc,
    };
    if !fits {
        anyhow::bail!(
            "Prediction rows hold {} values which does not fit {} classes for {:?}",
            row_len,
            nc,
            layout.clss,
        );
    }

    let (slice_bboxes, slice_id, slice_clss, slice_confs) = layout.parse_preds(preds, nc);
    let (img_w, img_h) = (params.image_width as f32, params.image_height as f32);

    let mut detections: Vec<BvrDetection> = slice_bboxes
        .axis_iter(Axis(0))
        .into_par_iter()
        .enumerate()
        .filter_map(|(i, bbox)| {
            // confidence & class_id
            let (class_id, confidence) = match &slice_id {
                Some(ids) => {
                    let id = ids[[i, 0]];
                    if !id.is_finite() || id < 0.0 {
                        return None;
                    }
                    (id.round() as usize, slice_clss[[i, 0]])
                }
                None => {
                    let (class_id, &confidence) = slice_clss
                        .index_axis(Axis(0), i)
                        .into_iter()
                        .enumerate()
                        .max_by(|a, b| a.1.total_cmp(b.1))?;

                    match &slice_confs {
                        None => (class_id, confidence),
                        Some(slice_confs) => (class_id, confidence * slice_confs[[i, 0]]),
                    }
                }
            };

            // filtering low scores
            if !(confidence >= params.conf_threshold) || class_id >= nc {
                return None;
            }

            let bbox = match layout.bbox {
                BoxType::Cxcywh => BvrBox::from_cxcywh(bbox[0], bbox[1], bbox[2], bbox[3]),
                BoxType::Xyxy => BvrBox::new(bbox[0], bbox[1], bbox[2], bbox[3]),
            };
            let clipped = bbox.unscale(params.ratio).clamp_to(img_w, img_h);
            if !clipped.is_finite() || clipped.width() <= 0.0 || clipped.height() <= 0.0 {
                return None;
            }

            Some(BvrDetection::new(class_id, clipped, confidence))
        })
        .collect();

    if layout.apply_nms {
        nms(&mut detections, params.iou_threshold);
    } else {
        detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    }

    Ok(detections)
}
