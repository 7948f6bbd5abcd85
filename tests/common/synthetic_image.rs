use haze_machine::image::{ImageF64, ImageRgbF64};
use haze_machine::{AtmosphericLight, HazeModel};

/// Atmospheric light used by [`hazy_landscape`].
pub const LANDSCAPE_LIGHT: [f64; 3] = [0.8, 0.85, 0.9];
pub const SKY_TRANSMISSION: f64 = 0.1;
pub const GROUND_TRANSMISSION: f64 = 0.7;

/// Haze-free scene: bright grey sky above `horizon`, below it vertical colour
/// stripes in which every pixel has one channel at 0.02.
pub fn landscape(width: usize, height: usize, horizon: usize) -> ImageRgbF64 {
    assert!(width > 0 && height > horizon, "horizon must lie inside the image");
    const STRIPES: [[f64; 3]; 3] = [[0.9, 0.4, 0.02], [0.02, 0.7, 0.5], [0.6, 0.02, 0.8]];
    ImageRgbF64::from_fn(width, height, |x, y| {
        if y < horizon {
            [0.95; 3]
        } else {
            STRIPES[(x / 8) % 3]
        }
    })
}

/// True transmission of [`hazy_landscape`].
pub fn landscape_transmission(width: usize, height: usize, horizon: usize) -> ImageF64 {
    ImageF64::from_fn(width, height, |_, y| {
        if y < horizon {
            SKY_TRANSMISSION
        } else {
            GROUND_TRANSMISSION
        }
    })
}

/// [`landscape`] seen through haze: thick over the sky, moderate below.
pub fn hazy_landscape(width: usize, height: usize, horizon: usize) -> ImageRgbF64 {
    let scene = landscape(width, height, horizon);
    let tr = landscape_transmission(width, height, horizon);
    let [r, g, b] = LANDSCAPE_LIGHT;
    HazeModel::with_default_t0(&tr, AtmosphericLight::new(r, g, b))
        .and_then(|model| model.augment(&scene))
        .expect("synthetic haze")
}

/// Depth map growing from 0 at the bottom row to 1 at the top, on all three
/// channels.
pub fn depth_ramp(width: usize, height: usize) -> ImageRgbF64 {
    assert!(height > 1, "ramp needs at least two rows");
    ImageRgbF64::from_fn(width, height, |_, y| {
        let d = (height - 1 - y) as f64 / (height - 1) as f64;
        [d; 3]
    })
}

/// Mean absolute per-channel difference over the rows `rows`.
pub fn mean_abs_diff(a: &ImageRgbF64, b: &ImageRgbF64, rows: std::ops::Range<usize>) -> f64 {
    assert_eq!((a.w, a.h), (b.w, b.h));
    let mut sum = 0.0;
    let mut count = 0usize;
    for y in rows {
        for x in 0..a.w {
            let (pa, pb) = (a.get(x, y), b.get(x, y));
            for c in 0..3 {
                sum += (pa[c] - pb[c]).abs();
                count += 1;
            }
        }
    }
    sum / count as f64
}
