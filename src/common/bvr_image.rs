use anyhow::{bail, Context, Result};
use image::{DynamicImage, RgbImage};
use crate::common::PixelArray;

/// An input image converted to 8-bit RGB, together with the threshold the model is invoked with.
#[derive(Debug, Clone, Default)]
pub struct BvrImage {
    pub image: RgbImage,
    pub threshold: f32,
}

impl std::ops::Deref for BvrImage {
    type Target = RgbImage;

    fn deref(&self) -> &Self::Target {
        &self.image
    }
}

impl From<BvrImage> for RgbImage {
    fn from(image: BvrImage) -> Self {
        image.into_rgb8()
    }
}

impl BvrImage {
    pub fn new(image: RgbImage, threshold: f32) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            bail!("Image has no pixels ({}x{})", width, height);
        }
        Ok(Self { image, threshold })
    }

    /// Converts any decoded image (grey, alpha, 16-bit, ...) into an RGB pixel array.
    /// The caller's image is left untouched.
    pub fn from_dynamic(image: &DynamicImage, threshold: f32) -> Result<Self> {
        Self::new(image.to_rgb8(), threshold)
    }

    /// Decodes an encoded image (PNG, JPEG, ...) guessing the format from its contents.
    pub fn decode(bytes: &[u8], threshold: f32) -> Result<Self> {
        if bytes.is_empty() {
            bail!("No image data was provided");
        }
        let image = image::load_from_memory(bytes).context("Unable to decode image")?;
        Self::from_dynamic(&image, threshold)
    }

    pub fn get_threshold(&self) -> f32 {
        self.threshold
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Working copy of the pixels for rendering, in RGB order.
    pub fn to_pixel_array(&self) -> PixelArray {
        PixelArray::from_rgb(self.image.clone())
    }

    pub fn into_rgb8(self) -> RgbImage {
        self.image
    }
}
