use image::{Rgb, RgbImage};

/// Order of the three colour channels inside a [`PixelArray`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    #[default] Rgb,
    Bgr,
}

/// H x W x 3 pixel buffer tagged with its channel order.
///
/// Rendering happens on a BGR working copy, the same layout OpenCV style drawing code uses,
/// so colours are always given in RGB and converted with [`PixelArray::colour`].
#[derive(Debug, Clone, PartialEq)]
pub struct PixelArray {
    pixels: RgbImage,
    order: ChannelOrder,
}

impl PixelArray {
    pub fn from_rgb(pixels: RgbImage) -> Self {
        Self {
            pixels,
            order: ChannelOrder::Rgb,
        }
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Reorders the channels in place when `order` differs from the current one.
    pub fn into_order(mut self, order: ChannelOrder) -> Self {
        if self.order != order {
            for px in self.pixels.pixels_mut() {
                px.0.swap(0, 2);
            }
            self.order = order;
        }
        self
    }

    /// Expresses an RGB colour in this array's channel order.
    pub fn colour(&self, rgb: Rgb<u8>) -> Rgb<u8> {
        match self.order {
            ChannelOrder::Rgb => rgb,
            ChannelOrder::Bgr => Rgb([rgb[2], rgb[1], rgb[0]]),
        }
    }

    pub fn canvas(&mut self) -> &mut RgbImage {
        &mut self.pixels
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.pixels
    }

    /// Returns the pixels in RGB order, converting back if needed.
    pub fn into_rgb(self) -> RgbImage {
        self.into_order(ChannelOrder::Rgb).pixels
    }
}
