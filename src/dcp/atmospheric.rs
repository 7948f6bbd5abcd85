//! Atmospheric light estimation from the dark channel.
use super::{check_patch_size, dark_channel};
use crate::error::{HazeError, Result};
use crate::image::ImageRgbF64;
use crate::types::{approx_eq, AtmosphericLight};
use log::debug;

/// Share of the haziest pixels considered as atmospheric-light candidates.
pub const DEFAULT_BRIGHTEST_SHARE: f64 = 1e-3;

struct Candidate {
    index: usize,
    dark: f64,
    intensity: f64,
}

/// Estimate the colour of the haze.
///
/// 1. Rank pixels by dark-channel value, descending. The sort is stable, so
///    ties keep row-major scan order.
/// 2. Keep the top `max(1, ⌈N · brightest_share⌉)` as candidates.
/// 3. Among candidates find the maximum intensity `R + G + B` and average the
///    colour of every candidate whose intensity equals it within relative
///    epsilon.
pub fn estimate_atmospheric_light(
    image: &ImageRgbF64,
    patch_size: usize,
    brightest_share: f64,
) -> Result<AtmosphericLight> {
    check_patch_size("estimate_atmospheric_light", patch_size)?;
    if !(0.0..=1.0).contains(&brightest_share) {
        return Err(HazeError::invalid(format!(
            "estimate_atmospheric_light: brightest_share is out of range (got {brightest_share})"
        )));
    }
    let dark = dark_channel(image, patch_size)?;

    let mut candidates: Vec<Candidate> = dark
        .data
        .iter()
        .zip(&image.data)
        .enumerate()
        .map(|(index, (&dark, px))| Candidate {
            index,
            dark,
            intensity: px[0] + px[1] + px[2],
        })
        .collect();
    candidates.sort_by(|lhs, rhs| rhs.dark.total_cmp(&lhs.dark));

    let border = ((candidates.len() as f64 * brightest_share).ceil() as usize)
        .max(1)
        .min(candidates.len());
    let top = &candidates[..border];

    let max_intensity = top
        .iter()
        .map(|c| c.intensity)
        .fold(f64::NEG_INFINITY, f64::max);

    let mut sum = [0.0; 3];
    let mut count = 0usize;
    for c in top.iter().filter(|c| approx_eq(max_intensity, c.intensity)) {
        let px = image.data[c.index];
        for ch in 0..3 {
            sum[ch] += px[ch];
        }
        count += 1;
    }
    if count == 0 {
        return Err(HazeError::runtime(
            "estimate_atmospheric_light: must be at least one pixel with max intensity",
        ));
    }
    let n = count as f64;
    let light = AtmosphericLight::new(sum[0] / n, sum[1] / n, sum[2] / n);
    debug!(
        "estimate_atmospheric_light candidates={} averaged={} A=[{:.4}, {:.4}, {:.4}]",
        border, count, light.0[0], light.0[1], light.0[2]
    );
    Ok(light)
}
