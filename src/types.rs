//! Small value types shared by every stage of the haze pipeline.
use serde::{Deserialize, Serialize};

/// Machine epsilon used for range checks and near-equality.
pub const EPS: f64 = f64::EPSILON;

/// Relative-epsilon comparison: `|a - b| < max(|a|, |b|, 1) · ε`.
///
/// Exact float equality is never used for pixel data; values that went through
/// an 8-bit round trip carry quantisation noise.
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() < scale * EPS
}

/// Global colour of the ambient (haze) light, one value per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AtmosphericLight(pub [f64; 3]);

impl AtmosphericLight {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self([r, g, b])
    }

    /// Grey light with the same level on every channel.
    pub fn uniform(level: f64) -> Self {
        Self([level; 3])
    }

    #[inline]
    pub fn channels(&self) -> [f64; 3] {
        self.0
    }
}

/// Which pipeline the executor runs, and therefore how many inputs it needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    /// Recover a haze-free scene from one hazy image.
    Dehazing,
    /// Synthesize haze from a clean image plus a depth map.
    Augmenting,
}

impl ProcessingMode {
    /// Minimum number of images the mode consumes.
    pub fn required_images(self) -> usize {
        match self {
            ProcessingMode::Dehazing => 1,
            ProcessingMode::Augmenting => 2,
        }
    }
}

impl std::fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingMode::Dehazing => f.write_str("dehazing"),
            ProcessingMode::Augmenting => f.write_str("augmenting"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approx_eq_tolerates_rounding_noise() {
        assert!(approx_eq(0.1 + 0.2, 0.3));
        assert!(approx_eq(3.0, 3.0 + 2.0 * EPS));
        assert!(!approx_eq(1.0, 1.0 + 1e-9));
    }

    #[test]
    fn mode_requires_one_or_two_images() {
        assert_eq!(ProcessingMode::Dehazing.required_images(), 1);
        assert_eq!(ProcessingMode::Augmenting.required_images(), 2);
    }
}
