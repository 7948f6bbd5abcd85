//! I/O boundary: 8-bit files in, normalised f64 buffers out (and back).
//!
//! - `load_rgb_image`: decode any supported format as 3-channel colour, `/ 255`.
//! - `save_rgb_image` / `save_gray_image`: `× 255`, round, saturate to `u8`.
//! - `write_json_file`: pretty-print a serializable value to disk.
//!
//! The format written is chosen from the path's extension.
use super::{ImageF64, ImageRgbF64, ImageView};
use crate::error::{HazeError, Result};
use image::{GrayImage, Luma, Rgb, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk as normalised RGB in `[0, 1]`.
///
/// Grey inputs are expanded to three channels and alpha is dropped.
pub fn load_rgb_image(path: &Path) -> Result<ImageRgbF64> {
    let img = image::open(path)
        .map_err(|source| HazeError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgb8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    let data = img
        .pixels()
        .map(|p| {
            [
                p[0] as f64 / 255.0,
                p[1] as f64 / 255.0,
                p[2] as f64 / 255.0,
            ]
        })
        .collect();
    Ok(ImageRgbF64 { w, h, data })
}

#[inline]
fn to_u8(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Save a colour image, saturating values outside `[0, 1]`.
pub fn save_rgb_image(image: &ImageRgbF64, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut out = RgbImage::new(image.w as u32, image.h as u32);
    for (y, row) in image.rows().enumerate() {
        for (x, px) in row.iter().enumerate() {
            out.put_pixel(x as u32, y as u32, Rgb([to_u8(px[0]), to_u8(px[1]), to_u8(px[2])]));
        }
    }
    out.save(path).map_err(|source| HazeError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Save a single-channel map as 8-bit grayscale, saturating outside `[0, 1]`.
pub fn save_gray_image(image: &ImageF64, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(image.w as u32, image.h as u32);
    for (y, row) in image.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            out.put_pixel(x as u32, y as u32, Luma([to_u8(px)]));
        }
    }
    out.save(path).map_err(|source| HazeError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        HazeError::Config(format!("Failed to serialize JSON for {}: {e}", path.display()))
    })?;
    fs::write(path, json).map_err(|e| HazeError::io(path, e))
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| HazeError::io(parent, e))?;
        }
    }
    Ok(())
}
