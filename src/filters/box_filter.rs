//! Normalised box (mean) filter.
//!
//! The window of size `kw × kh` is anchored at `(kw / 2, kh / 2)`, so an odd
//! window is centred and an even one extends one sample further towards the
//! top-left. Samples outside the image are mirrored without repeating the edge
//! (reflect-101: `dcb|abcd|cba`).
//!
//! Each pass pads one row/column, builds a prefix sum and reads every window
//! sum in O(1), so the cost is O(W·H) regardless of the window size.
use crate::error::{HazeError, Result};
use crate::image::{ImageF64, ImageView, ImageViewMut};

/// Map a possibly out-of-range index into `[0, n)` by reflect-101 mirroring.
#[inline]
fn reflect101(mut i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let n = n as isize;
    loop {
        if i < 0 {
            i = -i;
        } else if i >= n {
            i = 2 * n - 2 - i;
        } else {
            return i as usize;
        }
    }
}

/// Windowed sums of `line` with a window of `k` samples anchored at `k / 2`.
fn window_sums(line: &[f64], k: usize, prefix: &mut Vec<f64>, out: &mut [f64]) {
    let n = line.len();
    let anchor = (k / 2) as isize;
    prefix.clear();
    prefix.push(0.0);
    let mut acc = 0.0;
    for e in 0..n + k - 1 {
        acc += line[reflect101(e as isize - anchor, n)];
        prefix.push(acc);
    }
    for (x, dst) in out.iter_mut().enumerate() {
        *dst = prefix[x + k] - prefix[x];
    }
}

/// Mean of every `kw × kh` window.
pub fn box_blur(src: &ImageF64, kw: usize, kh: usize) -> Result<ImageF64> {
    if kw == 0 || kh == 0 {
        return Err(HazeError::invalid(format!(
            "box_blur: window size must be positive (got {kw}x{kh})"
        )));
    }
    if src.is_empty() {
        return Ok(src.clone());
    }
    let (w, h) = src.size();
    let mut prefix = Vec::with_capacity(w.max(h) + kw.max(kh));

    let mut horiz = ImageF64::new(w, h);
    for y in 0..h {
        window_sums(src.row(y), kw, &mut prefix, horiz.row_mut(y));
    }

    let norm = 1.0 / (kw * kh) as f64;
    let mut out = ImageF64::new(w, h);
    let mut column = vec![0.0; h];
    let mut sums = vec![0.0; h];
    for x in 0..w {
        for (y, v) in column.iter_mut().enumerate() {
            *v = horiz.get(x, y);
        }
        window_sums(&column, kh, &mut prefix, &mut sums);
        for (y, &s) in sums.iter().enumerate() {
            out.set(x, y, s * norm);
        }
    }
    Ok(out)
}
