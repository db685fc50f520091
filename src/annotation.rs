mod box_annotator;
mod colours;
mod label_annotator;

use ab_glyph::FontArc;
use anyhow::Context;
use crate::common::{BvrBox, BvrDetection, ChannelOrder, PixelArray};
use crate::data::AnnotationConfig;
use crate::detection_processing::PipelineError;

pub use box_annotator::BoxAnnotator;
pub use colours::{get_class_colour, CLASS_PALETTE};
pub use label_annotator::LabelAnnotator;

static BUNDLED_FONT: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// Draws detections onto pixel arrays: all boxes first, then all labels on top.
#[derive(Debug, Clone)]
pub struct Annotator {
    pub box_annotator: BoxAnnotator,
    pub label_annotator: LabelAnnotator,
    font: FontArc,
}

impl Annotator {
    pub fn new(box_annotator: BoxAnnotator, label_annotator: LabelAnnotator, font: FontArc) -> Self {
        Self {
            box_annotator,
            label_annotator,
            font,
        }
    }

    pub fn from_config(config: &AnnotationConfig) -> anyhow::Result<Self> {
        let font = match &config.font_path {
            Some(path) => {
                let data = std::fs::read(path)
                    .with_context(|| format!("Failed to read font file {path}"))?;
                FontArc::try_from_vec(data)
                    .map_err(|e| anyhow::anyhow!("Invalid font file {path}: {e}"))?
            }
            None => bundled_font()?,
        };

        Ok(Self::new(
            BoxAnnotator::new(config.box_thickness),
            LabelAnnotator::new(config.text_scale, config.text_thickness, config.text_padding),
            font,
        ))
    }

    pub fn font(&self) -> &FontArc {
        &self.font
    }

    /// Renders every detection onto `pixels` and hands the array back in the same channel order.
    pub fn annotate(&self, pixels: PixelArray, detections: &[BvrDetection]) -> Result<PixelArray, PipelineError> {
        let order = pixels.order();
        let mut scene = pixels.into_order(ChannelOrder::Bgr);

        let (w, h) = (scene.width(), scene.height());
        let boxes = detections
            .iter()
            .map(|detection| visible_box(&detection.bbox, w, h))
            .collect::<Result<Vec<_>, _>>()?;

        for (detection, bbox) in detections.iter().zip(boxes.iter()) {
            self.box_annotator.draw(&mut scene, bbox, detection.class_id);
        }
        for (detection, bbox) in detections.iter().zip(boxes.iter()) {
            self.label_annotator.draw(&mut scene, bbox, detection, &self.font);
        }

        Ok(scene.into_order(order))
    }
}

/// The bundled DejaVu Sans Mono face.
pub fn bundled_font() -> anyhow::Result<FontArc> {
    FontArc::try_from_slice(BUNDLED_FONT).map_err(|e| anyhow::anyhow!("Invalid bundled font: {e}"))
}

/// Inclusive pixel corners `(x1, y1, x2, y2)` of a box clipped to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl PixelBox {
    pub fn width(&self) -> u32 {
        (self.x2 - self.x1 + 1).max(1) as u32
    }

    pub fn height(&self) -> u32 {
        (self.y2 - self.y1 + 1).max(1) as u32
    }
}

/// Rejects boxes that cannot be drawn and clips the rest to a `width` x `height` image.
pub fn visible_box(bbox: &BvrBox, width: u32, height: u32) -> Result<PixelBox, PipelineError> {
    if !bbox.is_finite() {
        return Err(PipelineError::Rendering(format!("non-finite box coordinates {:?}", bbox.xyxy())));
    }
    if !bbox.is_ordered() {
        return Err(PipelineError::Rendering(format!("inverted box {:?}", bbox.xyxy())));
    }
    let (w, h) = (width as f32, height as f32);
    if bbox.x2 < 0.0 || bbox.y2 < 0.0 || bbox.x1 >= w || bbox.y1 >= h {
        return Err(PipelineError::Rendering(format!(
            "box {:?} lies outside the {}x{} image",
            bbox.xyxy(),
            width,
            height
        )));
    }

    let [x1, y1, x2, y2] = bbox.rounded();
    let (max_x, max_y) = (width as i32 - 1, height as i32 - 1);
    Ok(PixelBox {
        x1: x1.clamp(0, max_x),
        y1: y1.clamp(0, max_y),
        x2: x2.clamp(0, max_x),
        y2: y2.clamp(0, max_y),
    })
}
