//! Dark Channel Prior estimators.
//!
//! In a haze-free outdoor patch at least one colour channel is close to zero.
//! Haze lifts that minimum, so the dark channel of an image is a proxy for
//! local haze density. From it we derive:
//!
//! - the atmospheric light `A` ([`estimate_atmospheric_light`]): the mean
//!   colour of the brightest pixels among the haziest ones;
//! - the raw transmission `t = 1 − ω · dark(I / A)` ([`estimate_transmission`]).
//!
//! All windows are square with odd side `patch_size`; borders replicate.
mod atmospheric;

pub use atmospheric::{estimate_atmospheric_light, DEFAULT_BRIGHTEST_SHARE};

use crate::error::{HazeError, Result};
use crate::filters::{channel_min, min_filter};
use crate::image::{ImageF64, ImageRgbF64};
use crate::types::AtmosphericLight;
use log::debug;

/// Fraction of haze removed by [`estimate_transmission`]; the rest keeps
/// distant objects looking natural.
pub const DEFAULT_OMEGA: f64 = 0.95;

pub(crate) fn check_patch_size(op: &str, patch_size: usize) -> Result<()> {
    if patch_size % 2 == 0 {
        return Err(HazeError::invalid(format!(
            "{op}: patch size can't be even (got {patch_size})"
        )));
    }
    Ok(())
}

/// Minimum over channels, then minimum over a `patch_size × patch_size`
/// neighbourhood.
pub fn dark_channel(image: &ImageRgbF64, patch_size: usize) -> Result<ImageF64> {
    check_patch_size("dark_channel", patch_size)?;
    min_filter(&channel_min(image), patch_size)
}

/// Raw transmission map of `hazy_image` under atmospheric light `A`.
///
/// Each pixel is divided channel-wise by `A` (a zero channel of `A` yields
/// zero), and the result is `1 − ω · dark_channel(normalised)`.
pub fn estimate_transmission(
    hazy_image: &ImageRgbF64,
    atmospheric_light: &AtmosphericLight,
    patch_size: usize,
    omega: f64,
) -> Result<ImageF64> {
    check_patch_size("estimate_transmission", patch_size)?;
    let a = atmospheric_light.channels();
    debug!(
        "estimate_transmission {}x{} A=[{:.4}, {:.4}, {:.4}] patch={} omega={}",
        hazy_image.w, hazy_image.h, a[0], a[1], a[2], patch_size, omega
    );
    let normalized = ImageRgbF64 {
        w: hazy_image.w,
        h: hazy_image.h,
        data: hazy_image
            .data
            .iter()
            .map(|px| {
                let mut out = [0.0; 3];
                for c in 0..3 {
                    out[c] = if a[c] == 0.0 { 0.0 } else { px[c] / a[c] };
                }
                out
            })
            .collect(),
    };
    let dark = dark_channel(&normalized, patch_size)?;
    Ok(dark.map(|v| 1.0 - omega * v))
}
