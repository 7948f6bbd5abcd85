//! Transmission refinement.
//!
//! The raw transmission from the dark channel is constant over each patch and
//! shows block artifacts around object boundaries. A refiner smooths it,
//! optionally keyed on the hazy image so the result follows scene edges.
//!
//! - [`MeanRefiner`]: plain box blur, guide ignored. This is the default.
//! - [`GuidedFilterRefiner`]: colour-guided filter (local linear model of the
//!   transmission against the guide's RGB, regularised by `eps`).
//!
//! Both implement [`TransmissionRefiner`] and take and return the same shapes,
//! so the executor can swap them through [`RefinerKind`].
mod guided;
mod mean;

pub use guided::GuidedFilterRefiner;
pub use mean::MeanRefiner;

use crate::error::{HazeError, Result};
use crate::image::{ImageF64, ImageRgbF64, ImageView};
use serde::{Deserialize, Serialize};

pub trait TransmissionRefiner: Send + Sync {
    /// Smooth `transmission`; `guide` is the hazy image it was estimated from.
    fn refine(&self, transmission: &ImageF64, guide: &ImageRgbF64) -> Result<ImageF64>;

    fn name(&self) -> &'static str;
}

/// Selects a refiner implementation from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefinerKind {
    #[default]
    Mean,
    Guided,
}

impl RefinerKind {
    pub fn build(self, patch_size: usize, eps: f64) -> Box<dyn TransmissionRefiner> {
        match self {
            RefinerKind::Mean => Box::new(MeanRefiner::new(patch_size)),
            RefinerKind::Guided => Box::new(GuidedFilterRefiner::new(patch_size, eps)),
        }
    }
}

/// Refine with the default mean filter.
///
/// `eps` and `lambda` belong to the matting formulation and are accepted for
/// call compatibility; the mean filter ignores them and the guide.
pub fn refine(
    transmission: &ImageF64,
    guide: &ImageRgbF64,
    patch_size: usize,
    _eps: f64,
    _lambda: f64,
) -> Result<ImageF64> {
    MeanRefiner::new(patch_size).refine(transmission, guide)
}

pub(crate) fn check_inputs(
    op: &str,
    transmission: &ImageF64,
    guide: &ImageRgbF64,
    patch_size: usize,
) -> Result<()> {
    if patch_size % 2 == 0 {
        return Err(HazeError::invalid(format!(
            "{op}: patch size can't be even (got {patch_size})"
        )));
    }
    if !transmission.same_size(guide) {
        return Err(HazeError::invalid(format!(
            "{op}: transmission {}x{} and guide {}x{} differ in size",
            transmission.w, transmission.h, guide.w, guide.h
        )));
    }
    Ok(())
}
