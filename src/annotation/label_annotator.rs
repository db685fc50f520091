use ab_glyph::{FontArc, PxScale};
use image::Rgb;
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use crate::annotation::{get_class_colour, PixelBox};
use crate::common::{BvrDetection, PixelArray};

// Glyph height in pixels at `text_scale == 1.0`.
const PX_PER_TEXT_SCALE: f32 = 30.0;
const TEXT_COLOUR: Rgb<u8> = Rgb([255, 255, 255]);

/// Writes each detection's caption on a filled tag sitting on the box's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelAnnotator {
    pub text_scale: f32,
    pub text_thickness: u32,
    pub text_padding: u32,
}

impl Default for LabelAnnotator {
    fn default() -> Self {
        Self {
            text_scale: 0.5,
            text_thickness: 1,
            text_padding: 10,
        }
    }
}

impl LabelAnnotator {
    pub fn new(text_scale: f32, text_thickness: u32, text_padding: u32) -> Self {
        Self {
            text_scale,
            text_thickness: text_thickness.max(1),
            text_padding,
        }
    }

    pub fn px_scale(&self) -> PxScale {
        PxScale::from((self.text_scale * PX_PER_TEXT_SCALE).max(1.0))
    }

    /// Tag rectangle `(x, y, w, h)` for a caption of `text_w` x `text_h` pixels,
    /// above the box when there is room and always inside the image.
    pub fn tag_rect(&self, bbox: &PixelBox, text_w: u32, text_h: u32, img_w: u32, img_h: u32) -> (i32, i32, u32, u32) {
        let pad = self.text_padding;
        let tag_w = text_w
            .saturating_add(pad.saturating_mul(2))
            .saturating_add(self.text_thickness.saturating_sub(1))
            .clamp(1, img_w);
        let tag_h = text_h.saturating_add(pad.saturating_mul(2)).clamp(1, img_h);

        let x = bbox.x1.min(img_w as i32 - tag_w as i32).max(0);
        let y = (bbox.y1 - tag_h as i32).clamp(0, img_h as i32 - tag_h as i32);
        (x, y, tag_w, tag_h)
    }

    pub fn draw(&self, pixels: &mut PixelArray, bbox: &PixelBox, detection: &BvrDetection, font: &FontArc) {
        let caption = detection.caption();
        let scale = self.px_scale();
        let (text_w, text_h) = text_size(scale, font, &caption);
        let (img_w, img_h) = (pixels.width(), pixels.height());
        let (x, y, tag_w, tag_h) = self.tag_rect(bbox, text_w, text_h, img_w, img_h);

        let background = pixels.colour(get_class_colour(detection.class_id));
        let foreground = pixels.colour(TEXT_COLOUR);
        let canvas = pixels.canvas();

        draw_filled_rect_mut(canvas, Rect::at(x, y).of_size(tag_w, tag_h), background);
        let pad = self.text_padding.min(img_w.max(img_h)) as i32;
        let (tx, ty) = (x + pad, y + pad);
        for dx in 0..self.text_thickness.min(img_w) as i32 {
            draw_text_mut(canvas, foreground, tx + dx, ty, scale, font, &caption);
        }
    }
}
