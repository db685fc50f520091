//! File/code adapted from https://github.com/jamjamjon/usls

use ndarray::{ArrayView, Axis, IxDyn};
use serde::{Deserialize, Serialize};

/// Accepted version names, as written in config files.
pub const MODEL_VERSION_NAMES: [&str; 8] =
    ["yolov5", "yolov6", "yolov7", "yolov8", "yolov9", "yolov10", "yolov11", "yolov12"];

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelVersion {
    YoloV5,
    YoloV6,
    YoloV7,
    #[default] YoloV8,
    YoloV9,
    YoloV10,
    YoloV11,
    YoloV12,
}

impl ModelVersion {
    pub fn name(&self) -> String {
        match self {
            Self::YoloV5 => "YoloV5".to_string(),
            Self::YoloV6 => "YoloV6".to_string(),
            Self::YoloV7 => "YoloV7".to_string(),
            Self::YoloV8 => "YoloV8".to_string(),
            Self::YoloV9 => "YoloV9".to_string(),
            Self::YoloV10 => "YoloV10".to_string(),
            Self::YoloV11 => "YoloV11".to_string(),
            Self::YoloV12 => "YoloV12".to_string(),
        }
    }

    /// Case-insensitive, `None` for anything not in [`MODEL_VERSION_NAMES`].
    pub fn parse(version: &str) -> Option<ModelVersion> {
        match version.to_lowercase().as_str() {
            "yolov5" => Some(ModelVersion::YoloV5),
            "yolov6" => Some(ModelVersion::YoloV6),
            "yolov7" => Some(ModelVersion::YoloV7),
            "yolov8" => Some(ModelVersion::YoloV8),
            "yolov9" => Some(ModelVersion::YoloV9),
            "yolov10" => Some(ModelVersion::YoloV10),
            "yolov11" => Some(ModelVersion::YoloV11),
            "yolov12" => Some(ModelVersion::YoloV12),
            _ => None,
        }
    }

    /// Output tensor layout of the exported detection head.
    pub fn layout(&self) -> YoloPreds {
        match self {
            Self::YoloV5 | Self::YoloV6 | Self::YoloV7 => YoloPreds::n_a_cxcywh_confclss(),
            Self::YoloV8 | Self::YoloV9 | Self::YoloV11 | Self::YoloV12 => YoloPreds::n_cxcywh_clss_a(),
            Self::YoloV10 => YoloPreds::n_a_xyxy_confcls().apply_nms(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoxType {
    /// cx, cy, w, h
    Cxcywh,

    /// x1, y1, x2, y2
    Xyxy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClssType {
    /// One score per class.
    Clss,
    /// Score followed by class id.
    ConfCls,
    /// Objectness followed by one score per class.
    ConfClss,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnchorsPosition {
    Before,
    After,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YoloPreds {
    pub clss: ClssType,
    pub bbox: BoxType,
    pub anchors: AnchorsPosition,
    pub apply_nms: bool,
}

/// Column views over one image's predictions: boxes, class ids, class scores, objectness.
pub type ParsedPreds<'a> = (
    ArrayView<'a, f32, IxDyn>,
    Option<ArrayView<'a, f32, IxDyn>>,
    ArrayView<'a, f32, IxDyn>,
    Option<ArrayView<'a, f32, IxDyn>>,
);

impl YoloPreds {
    pub fn apply_nms(mut self, x: bool) -> Self {
        self.apply_nms = x;
        self
    }

    pub fn n_a_cxcywh_confclss() -> Self {
        // YOLOv5 | YOLOv6 | YOLOv7 : NACxcywhConfClss
        Self {
            bbox: BoxType::Cxcywh,
            clss: ClssType::ConfClss,
            anchors: AnchorsPosition::Before,
            apply_nms: true,
        }
    }

    pub fn n_cxcywh_clss_a() -> Self {
        // YOLOv8 | YOLOv9 | YOLO11 : NCxcywhClssA
        Self {
            bbox: BoxType::Cxcywh,
            clss: ClssType::Clss,
            anchors: AnchorsPosition::After,
            apply_nms: true,
        }
    }

    pub fn n_a_xyxy_confcls() -> Self {
        // YOLOv10 : NAXyxyConfCls
        Self {
            bbox: BoxType::Xyxy,
            clss: ClssType::ConfCls,
            anchors: AnchorsPosition::Before,
            apply_nms: true,
        }
    }

    pub fn is_anchors_first(&self) -> bool {
        matches!(self.anchors, AnchorsPosition::Before)
    }

    /// Number of classes implied by a prediction row of `row_len` values.
    pub fn nc_from_row_len(&self, row_len: usize) -> usize {
        match self.clss {
            ClssType::Clss => row_len.saturating_sub(4),
            ClssType::ConfClss => row_len.saturating_sub(5),
            ClssType::ConfCls => 0,
        }
    }

    /// Splits a single image's predictions (`[anchors, values]` or `[values, anchors]`)
    /// into anchor-major column views.
    pub fn parse_preds<'a>(&self, x: ArrayView<'a, f32, IxDyn>, nc: usize) -> ParsedPreds<'a> {
        let x = if self.is_anchors_first() {
            x
        } else {
            x.reversed_axes()
        };

        // get each tasks slices
        let (slice_bboxes, xs) = x.split_at(Axis(1), 4);

        let (slice_id, slice_clss, slice_confs) = match self.clss {
            ClssType::ConfClss => {
                let (confs, xs) = xs.split_at(Axis(1), 1);
                let (clss, _xs) = xs.split_at(Axis(1), nc);
                (None, clss, Some(confs))
            }
            ClssType::ConfCls => {
                let (clss, xs) = xs.split_at(Axis(1), 1);
                let (ids, _xs) = xs.split_at(Axis(1), 1);
                (Some(ids), clss, None)
            }
            ClssType::Clss => {
                let (clss, _xs) = xs.split_at(Axis(1), nc);
                (None, clss, None)
            }
        };

        (slice_bboxes, slice_id, slice_clss, slice_confs)
    }
}
