//! Full-reference quality measures between a result and a ground-truth image.
//!
//! - [`mse`]: mean squared error over every channel value.
//! - [`ssim`]: mean structural similarity (Wang et al.), computed per channel
//!   over a uniform `7 × 7` window and averaged over channels.
//!
//! Both work on the normalised `[0, 1]` scale, so an MSE of `1e-3` here is
//! `65.025` in 8-bit units.
//!
//! [`compare`] runs both over two directories of images paired by name.
mod compare;

pub use compare::{compare, ComparisonReport, ImageComparison};

use crate::error::{HazeError, Result};
use crate::filters::box_blur;
use crate::image::{ImageF64, ImageRgbF64, ImageView};

/// Side of the SSIM window.
pub const SSIM_WINDOW: usize = 7;
const K1: f64 = 0.01;
const K2: f64 = 0.03;
/// Dynamic range of normalised images.
const DATA_RANGE: f64 = 1.0;

fn check_sizes(op: &str, lhs: &ImageRgbF64, rhs: &ImageRgbF64) -> Result<()> {
    if !lhs.same_size(rhs) {
        return Err(HazeError::invalid(format!(
            "{op}: images have incorrect size ({}x{} vs {}x{})",
            lhs.w, lhs.h, rhs.w, rhs.h
        )));
    }
    Ok(())
}

pub fn mse(lhs: &ImageRgbF64, rhs: &ImageRgbF64) -> Result<f64> {
    check_sizes("mse", lhs, rhs)?;
    if lhs.is_empty() {
        return Err(HazeError::invalid("mse: images are empty"));
    }
    let sum: f64 = lhs
        .data
        .iter()
        .zip(&rhs.data)
        .flat_map(|(a, b)| (0..3).map(move |c| (a[c] - b[c]) * (a[c] - b[c])))
        .sum();
    Ok(sum / (lhs.data.len() * 3) as f64)
}

fn product(a: &ImageF64, b: &ImageF64) -> ImageF64 {
    ImageF64 {
        w: a.w,
        h: a.h,
        data: a.data.iter().zip(&b.data).map(|(x, y)| x * y).collect(),
    }
}

/// Mean SSIM of one channel, ignoring the half-window border.
fn channel_ssim(x: &ImageF64, y: &ImageF64) -> Result<f64> {
    let k = SSIM_WINDOW;
    let mean = |img: &ImageF64| box_blur(img, k, k);
    let (ux, uy) = (mean(x)?, mean(y)?);
    let (uxx, uyy, uxy) = (mean(&product(x, x))?, mean(&product(y, y))?, mean(&product(x, y))?);

    // Unbiased local (co)variances.
    let np = (k * k) as f64;
    let cov_norm = np / (np - 1.0);
    let c1 = (K1 * DATA_RANGE).powi(2);
    let c2 = (K2 * DATA_RANGE).powi(2);

    let pad = k / 2;
    let mut sum = 0.0;
    let mut count = 0usize;
    for py in pad..x.h - pad {
        for px in pad..x.w - pad {
            let i = x.idx(px, py);
            let (mx, my) = (ux.data[i], uy.data[i]);
            let vx = cov_norm * (uxx.data[i] - mx * mx);
            let vy = cov_norm * (uyy.data[i] - my * my);
            let vxy = cov_norm * (uxy.data[i] - mx * my);
            let num = (2.0 * mx * my + c1) * (2.0 * vxy + c2);
            let den = (mx * mx + my * my + c1) * (vx + vy + c2);
            sum += num / den;
            count += 1;
        }
    }
    Ok(sum / count as f64)
}

/// Mean structural similarity in `[-1, 1]`; 1 means identical.
///
/// Both images must share a size of at least [`SSIM_WINDOW`] on each side.
pub fn ssim(lhs: &ImageRgbF64, rhs: &ImageRgbF64) -> Result<f64> {
    check_sizes("ssim", lhs, rhs)?;
    if lhs.w < SSIM_WINDOW || lhs.h < SSIM_WINDOW {
        return Err(HazeError::invalid(format!(
            "ssim: images must be at least {SSIM_WINDOW}x{SSIM_WINDOW} (got {}x{})",
            lhs.w, lhs.h
        )));
    }
    let mut total = 0.0;
    for c in 0..3 {
        total += channel_ssim(&lhs.channel(c), &rhs.channel(c))?;
    }
    Ok(total / 3.0)
}
