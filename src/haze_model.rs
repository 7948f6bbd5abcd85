//! Atmospheric scattering model `I = t · J + (1 − t) · A`.
//!
//! - `I`: observed (hazy) intensity
//! - `J`: scene radiance (haze-free image)
//! - `t`: transmission, the fraction of scene light reaching the camera
//! - `A`: global atmospheric light
//!
//! [`HazeModel`] holds `t` and `A` and applies the model forwards
//! ([`HazeModel::augment_image`]) or inverts it ([`HazeModel::recover_image`]).
//! Inversion divides by `max(t, t0)` so near-opaque regions do not blow up.
use crate::error::{HazeError, Result};
use crate::image::{ImageF64, ImageRgbF64, ImageView};
use crate::types::AtmosphericLight;

/// Lower bound on transmission applied during recovery.
pub const DEFAULT_T0: f64 = 0.1;

/// Beer-Lambert attenuation: `t = exp(−β · depth)` per pixel.
///
/// No range is imposed on depth; `β = 0` gives a transmission of 1 everywhere.
pub fn create_transmission(depth_map: &ImageF64, beta: f64) -> ImageF64 {
    depth_map.map(|d| (-beta * d).exp())
}

/// Immutable transmission + atmospheric light pair.
#[derive(Clone, Debug)]
pub struct HazeModel {
    transmission: ImageF64,
    atmospheric_light: AtmosphericLight,
    t0: f64,
}

impl HazeModel {
    /// Fails with `InvalidArgument` for an empty transmission map or a
    /// non-positive / non-finite `t0`.
    pub fn new(transmission: &ImageF64, atmospheric_light: AtmosphericLight, t0: f64) -> Result<Self> {
        if transmission.is_empty() {
            return Err(HazeError::invalid(
                "HazeModel::new: incorrect matrices' sizes (empty transmission)",
            ));
        }
        if !(t0.is_finite() && t0 > 0.0) {
            return Err(HazeError::invalid(format!(
                "HazeModel::new: t0 must be positive (got {t0})"
            )));
        }
        Ok(Self {
            transmission: transmission.clone(),
            atmospheric_light,
            t0,
        })
    }

    pub fn with_default_t0(transmission: &ImageF64, atmospheric_light: AtmosphericLight) -> Result<Self> {
        Self::new(transmission, atmospheric_light, DEFAULT_T0)
    }

    pub fn transmission(&self) -> &ImageF64 {
        &self.transmission
    }

    pub fn atmospheric_light(&self) -> AtmosphericLight {
        self.atmospheric_light
    }

    pub fn t0(&self) -> f64 {
        self.t0
    }

    fn check_buffers(&self, op: &str, result: &ImageRgbF64, input: &ImageRgbF64) -> Result<()> {
        if !input.same_size(&self.transmission) {
            return Err(HazeError::invalid(format!(
                "HazeModel::{op}: incorrect size of input ({}x{}, expected {}x{})",
                input.w, input.h, self.transmission.w, self.transmission.h
            )));
        }
        if !result.same_size(&self.transmission) {
            return Err(HazeError::invalid(format!(
                "HazeModel::{op}: incorrect size of result ({}x{}, expected {}x{})",
                result.w, result.h, self.transmission.w, self.transmission.h
            )));
        }
        Ok(())
    }

    /// Forward model into a pre-sized `result`: `I = t · J + (1 − t) · A`.
    pub fn augment_image(&self, result: &mut ImageRgbF64, scene_radiance: &ImageRgbF64) -> Result<()> {
        self.check_buffers("augment_image", result, scene_radiance)?;
        let a = self.atmospheric_light.channels();
        for ((dst, src), &t) in result
            .data
            .iter_mut()
            .zip(&scene_radiance.data)
            .zip(&self.transmission.data)
        {
            for c in 0..3 {
                dst[c] = t * src[c] + (1.0 - t) * a[c];
            }
        }
        Ok(())
    }

    /// Inverse model into a pre-sized `result`: `J = (I − A) / max(t, t0) + A`.
    pub fn recover_image(&self, result: &mut ImageRgbF64, observed_intensity: &ImageRgbF64) -> Result<()> {
        self.check_buffers("recover_image", result, observed_intensity)?;
        let a = self.atmospheric_light.channels();
        for ((dst, src), &t) in result
            .data
            .iter_mut()
            .zip(&observed_intensity.data)
            .zip(&self.transmission.data)
        {
            let t = t.max(self.t0);
            for c in 0..3 {
                dst[c] = (src[c] - a[c]) / t + a[c];
            }
        }
        Ok(())
    }

    /// Allocating form of [`HazeModel::augment_image`].
    pub fn augment(&self, scene_radiance: &ImageRgbF64) -> Result<ImageRgbF64> {
        let mut out = ImageRgbF64::new(self.transmission.w, self.transmission.h);
        self.augment_image(&mut out, scene_radiance)?;
        Ok(out)
    }

    /// Allocating form of [`HazeModel::recover_image`].
    pub fn recover(&self, observed_intensity: &ImageRgbF64) -> Result<ImageRgbF64> {
        let mut out = ImageRgbF64::new(self.transmission.w, self.transmission.h);
        self.recover_image(&mut out, observed_intensity)?;
        Ok(out)
    }
}
