use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use crate::annotation::{get_class_colour, PixelBox};
use crate::common::PixelArray;

/// Outlines each detection with a rectangle in its class colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxAnnotator {
    pub thickness: u32,
}

impl Default for BoxAnnotator {
    fn default() -> Self {
        Self { thickness: 2 }
    }
}

impl BoxAnnotator {
    pub fn new(thickness: u32) -> Self {
        Self { thickness: thickness.max(1) }
    }

    /// Strokes grow inwards from the box edge so they never leave the clipped box.
    pub fn draw(&self, pixels: &mut PixelArray, bbox: &PixelBox, class_id: usize) {
        let colour = pixels.colour(get_class_colour(class_id));
        let canvas = pixels.canvas();

        // Inner strokes stop at the box centre.
        let strokes = self.thickness.min(bbox.width().min(bbox.height()).div_ceil(2));
        for t in 0..strokes as i32 {
            let (x1, y1) = (bbox.x1 + t, bbox.y1 + t);
            let (x2, y2) = (bbox.x2 - t, bbox.y2 - t);
            if x2 < x1 || y2 < y1 {
                break;
            }
            let rect = Rect::at(x1, y1).of_size((x2 - x1 + 1) as u32, (y2 - y1 + 1) as u32);
            draw_hollow_rect_mut(canvas, rect, colour);
        }
    }
}
