//! File adapted from: https://github.com/jamjamjon
//!
//! Functions to preprocess images.

use anyhow::{bail, Result};
use image::{imageops::FilterType, Rgb, RgbImage};
use ndarray::Array;
use crate::detection_runners::input_wrapper::X;

/// Padding value used around letterboxed images.
pub const LETTERBOX_FILL: u8 = 114;

/// Scale factor that fits a `width` x `height` image inside `target_w` x `target_h`.
pub fn letterbox_ratio(width: u32, height: u32, target_w: u32, target_h: u32) -> f32 {
    (target_w as f32 / width as f32).min(target_h as f32 / height as f32)
}

/// Resizes `img` into the top-left corner of a `target_w` x `target_h` canvas filled with `bg`,
/// keeping its aspect ratio. Returns the canvas and the scale factor applied.
pub fn letterbox_image(img: &RgbImage, target_w: u32, target_h: u32, bg: u8) -> Result<(RgbImage, f32)> {
    let (w0, h0) = img.dimensions();
    if w0 == 0 || h0 == 0 {
        bail!("Cannot letterbox an empty image ({w0}x{h0})");
    }
    if target_w == 0 || target_h == 0 {
        bail!("Invalid model input size {target_w}x{target_h}");
    }

    let ratio = letterbox_ratio(w0, h0, target_w, target_h);
    let new_w = ((w0 as f32 * ratio).round() as u32).clamp(1, target_w);
    let new_h = ((h0 as f32 * ratio).round() as u32).clamp(1, target_h);

    let mut padded = RgbImage::from_pixel(target_w, target_h, Rgb([bg, bg, bg]));
    let resized = if (new_w, new_h) == (w0, h0) {
        img.clone()
    } else {
        image::imageops::resize(img, new_w, new_h, FilterType::Triangle)
    };
    image::imageops::replace(&mut padded, &resized, 0, 0);

    Ok((padded, ratio))
}

/// Packs an RGB image into a `[1, 3, H, W]` tensor scaled to `0..=1`.
pub fn nchw_normalize(img: &RgbImage) -> Result<X> {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let buf = img.as_raw();
    if buf.len() != w * h * 3 {
        bail!("Unexpected buffer size: got {}, expected {}", buf.len(), w * h * 3);
    }

    let hw = w * h;
    let mut out = vec![0.0f32; buf.len()];
    for i in 0..hw {
        out[i] = buf[3 * i] as f32 / 255.0;
        out[i + hw] = buf[3 * i + 1] as f32 / 255.0;
        out[i + 2 * hw] = buf[3 * i + 2] as f32 / 255.0;
    }

    Ok(X::from(Array::from_shape_vec((1, 3, h, w), out)?.into_dyn()))
}

/// Letterboxes and normalizes in one step.
pub fn preprocess(img: &RgbImage, target_w: u32, target_h: u32) -> Result<(X, f32)> {
    let (padded, ratio) = letterbox_image(img, target_w, target_h, LETTERBOX_FILL)?;
    Ok((nchw_normalize(&padded)?, ratio))
}
