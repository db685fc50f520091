use serde::{Deserialize, Serialize};

/// Axis-aligned box in source image pixels, corners `(x1, y1)` top-left and `(x2, y2)` bottom-right.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BvrBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BvrBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Builds a box from its centre and size, the layout most YOLO heads emit.
    pub fn from_cxcywh(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        let (half_w, half_h) = (w / 2.0, h / 2.0);
        Self::new(cx - half_w, cy - half_h, cx + half_w, cy + half_h)
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Zero for inverted boxes.
    pub fn area(&self) -> f32 {
        self.width().max(0.) * self.height().max(0.)
    }

    pub fn xyxy(&self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    pub fn intersect(&self, other: &BvrBox) -> f32 {
        let w = self.x2.min(other.x2) - self.x1.max(other.x1);
        let h = self.y2.min(other.y2) - self.y1.max(other.y1);
        w.max(0.) * h.max(0.)
    }

    pub fn union(&self, other: &BvrBox) -> f32 {
        self.area() + other.area() - self.intersect(other)
    }

    pub fn is_finite(&self) -> bool {
        self.xyxy().iter().all(|v| v.is_finite())
    }

    /// Whether the corners are ordered, zero-size boxes included.
    pub fn is_ordered(&self) -> bool {
        self.x2 >= self.x1 && self.y2 >= self.y1
    }

    /// Corners rounded to the nearest pixel.
    pub fn rounded(&self) -> [i32; 4] {
        self.xyxy().map(|v| v.round() as i32)
    }

    /// Scales every coordinate by `1 / ratio`, undoing a letterbox resize.
    pub fn unscale(self, ratio: f32) -> Self {
        Self::new(self.x1 / ratio, self.y1 / ratio, self.x2 / ratio, self.y2 / ratio)
    }

    /// Clamps the box so it lies inside a `width` x `height` image.
    pub fn clamp_to(self, width: f32, height: f32) -> Self {
        Self::new(
            self.x1.clamp(0., width),
            self.y1.clamp(0., height),
            self.x2.clamp(0., width),
            self.y2.clamp(0., height),
        )
    }
}
