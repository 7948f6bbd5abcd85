use super::timing::TimingBreakdown;
use crate::image::ImageF64;
use crate::types::{AtmosphericLight, ProcessingMode};
use serde::Serialize;

/// Value range and mean of a single-channel map.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl MapSummary {
    pub fn of(map: &ImageF64) -> Self {
        let (min, max) = map.min_max().unwrap_or((0.0, 0.0));
        Self {
            min,
            max,
            mean: map.mean(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReport {
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub atmospheric_light: AtmosphericLight,
    /// Transmission that entered the haze model.
    pub transmission: MapSummary,
    /// Scattering coefficient sampled in augmenting mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
    /// Share of recovered channel values outside `[0, 1]` in dehazing mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clipped_share: Option<f64>,
    pub timings: TimingBreakdown,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub mode: ProcessingMode,
    pub seed: u64,
    pub total_ms: f64,
    pub images: Vec<ImageReport>,
}
