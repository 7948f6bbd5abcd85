//! Parameters of the dehazing and augmenting pipelines.
//!
//! Defaults reproduce the reference behaviour: 15 px dark-channel patches,
//! top 0.1 % haziest pixels for the atmospheric light, ω = 0.95, a 51 px mean
//! filter for refinement, t0 = 0.1; for augmentation β ∈ [1.5, 3.0), light
//! level ∈ [0.3, 0.7), a 30 px depth blur and a depth floor of 0.3.

use crate::dcp::{DEFAULT_BRIGHTEST_SHARE, DEFAULT_OMEGA};
use crate::error::{HazeError, Result};
use crate::haze_model::DEFAULT_T0;
use crate::refine::RefinerKind;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorParams {
    /// Odd window of the dark channel (and everything derived from it).
    pub patch_size: usize,
    /// Share of the haziest pixels used to estimate the atmospheric light.
    pub brightest_share: f64,
    /// Fraction of haze removed when estimating transmission.
    pub omega: f64,
    /// Transmission floor for recovery.
    pub t0: f64,
    pub refiner: RefinerKind,
    /// Odd window of the transmission refiner.
    pub refine_patch_size: usize,
    /// Regularisation of the guided refiner; the mean refiner ignores it.
    pub refine_eps: f64,
    /// Half-open range `[lo, hi)` the scattering coefficient is drawn from.
    pub beta_range: [f64; 2],
    /// Half-open range `[lo, hi)` the grey atmospheric light is drawn from.
    pub light_range: [f64; 2],
    /// Side of the box blur applied to the depth map; may be even.
    pub depth_blur_size: usize,
    /// Floor applied to the blurred depth so no pixel gets ultra-thick haze.
    pub min_depth: f64,
    /// Seed of the executor's random source; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for ExecutorParams {
    fn default() -> Self {
        Self {
            patch_size: 15,
            brightest_share: DEFAULT_BRIGHTEST_SHARE,
            omega: DEFAULT_OMEGA,
            t0: DEFAULT_T0,
            refiner: RefinerKind::Mean,
            refine_patch_size: 51,
            refine_eps: 0.01,
            beta_range: [1.5, 3.0],
            light_range: [0.3, 0.7],
            depth_blur_size: 30,
            min_depth: 0.3,
            seed: None,
        }
    }
}

fn check_range(name: &str, range: [f64; 2]) -> Result<()> {
    let [lo, hi] = range;
    if !(lo.is_finite() && hi.is_finite() && lo < hi) {
        return Err(HazeError::invalid(format!(
            "ExecutorParams: {name} must be a non-empty finite range (got [{lo}, {hi}))"
        )));
    }
    Ok(())
}

impl ExecutorParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_refiner(mut self, refiner: RefinerKind) -> Self {
        self.refiner = refiner;
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (name, size) in [
            ("patch_size", self.patch_size),
            ("refine_patch_size", self.refine_patch_size),
        ] {
            if size % 2 == 0 {
                return Err(HazeError::invalid(format!(
                    "ExecutorParams: {name} can't be even (got {size})"
                )));
            }
        }
        if self.depth_blur_size == 0 {
            return Err(HazeError::invalid("ExecutorParams: depth_blur_size must be positive"));
        }
        if !(0.0..=1.0).contains(&self.brightest_share) {
            return Err(HazeError::invalid(format!(
                "ExecutorParams: brightest_share is out of range (got {})",
                self.brightest_share
            )));
        }
        if !(self.t0.is_finite() && self.t0 > 0.0) {
            return Err(HazeError::invalid(format!(
                "ExecutorParams: t0 must be positive (got {})",
                self.t0
            )));
        }
        if !(self.refine_eps.is_finite() && self.refine_eps >= 0.0) {
            return Err(HazeError::invalid(format!(
                "ExecutorParams: refine_eps must be non-negative (got {})",
                self.refine_eps
            )));
        }
        check_range("beta_range", self.beta_range)?;
        check_range("light_range", self.light_range)?;
        Ok(())
    }
}
