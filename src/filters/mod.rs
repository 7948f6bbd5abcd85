//! Primitive image operations used by the haze pipeline.
//!
//! - [`morphology::min_filter`]: sliding-window minimum (rectangular erosion)
//!   with replicated borders.
//! - [`box_filter::box_blur`]: normalised mean filter via running sums, with
//!   reflect-101 borders.
//! - Per-pixel helpers: channel minimum, lower clamp, range validation.
pub mod box_filter;
pub mod morphology;

pub use box_filter::box_blur;
pub use morphology::min_filter;

use crate::image::{ImageF64, ImageRgbF64};

/// Per-pixel minimum over the three colour channels.
pub fn channel_min(image: &ImageRgbF64) -> ImageF64 {
    ImageF64 {
        w: image.w,
        h: image.h,
        data: image
            .data
            .iter()
            .map(|px| px[0].min(px[1]).min(px[2]))
            .collect(),
    }
}

/// Elementwise `max(v, floor)`.
pub fn clamp_min(image: &ImageF64, floor: f64) -> ImageF64 {
    image.map(|v| v.max(floor))
}

/// Location and value of the first channel value outside `[lo, hi]`.
///
/// NaN is always reported as out of range.
pub fn find_out_of_range(image: &ImageRgbF64, lo: f64, hi: f64) -> Option<(usize, usize, f64)> {
    image.data.iter().enumerate().find_map(|(i, px)| {
        px.iter()
            .find(|&&v| !(lo..=hi).contains(&v))
            .map(|&v| (i % image.w.max(1), i / image.w.max(1), v))
    })
}
