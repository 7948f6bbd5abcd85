//! Rectangular erosion (sliding-window minimum).
//!
//! Separable: a horizontal then a vertical 1D minimum over `size` samples
//! centred on each pixel. Borders replicate the edge pixel, which for a
//! minimum is the same as clamping the window to the image.
use crate::error::{HazeError, Result};
use crate::image::{ImageF64, ImageView, ImageViewMut};

/// Local minimum over a `size × size` window centred at each pixel.
///
/// `size` must be odd. Empty images are returned unchanged.
pub fn min_filter(src: &ImageF64, size: usize) -> Result<ImageF64> {
    if size % 2 == 0 {
        return Err(HazeError::invalid(format!(
            "min_filter: window size can't be even (got {size})"
        )));
    }
    if src.is_empty() || size == 1 {
        return Ok(src.clone());
    }
    let r = size / 2;
    let (w, h) = src.size();

    let mut horiz = ImageF64::new(w, h);
    for y in 0..h {
        let src_row = src.row(y);
        let dst_row = horiz.row_mut(y);
        for (x, dst) in dst_row.iter_mut().enumerate() {
            let x0 = x.saturating_sub(r);
            let x1 = (x + r).min(w - 1);
            *dst = src_row[x0..=x1].iter().copied().fold(f64::INFINITY, f64::min);
        }
    }

    let mut out = ImageF64::new(w, h);
    let mut column = vec![0.0; h];
    for x in 0..w {
        for (y, v) in column.iter_mut().enumerate() {
            *v = horiz.get(x, y);
        }
        for y in 0..h {
            let y0 = y.saturating_sub(r);
            let y1 = (y + r).min(h - 1);
            let m = column[y0..=y1].iter().copied().fold(f64::INFINITY, f64::min);
            out.set(x, y, m);
        }
    }
    Ok(out)
}
