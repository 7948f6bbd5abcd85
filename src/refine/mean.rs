use super::{check_inputs, TransmissionRefiner};
use crate::error::Result;
use crate::filters::box_blur;
use crate::image::{ImageF64, ImageRgbF64};
use log::debug;

/// Box blur of the transmission over an odd `patch_size` window.
#[derive(Clone, Copy, Debug)]
pub struct MeanRefiner {
    pub patch_size: usize,
}

impl MeanRefiner {
    pub fn new(patch_size: usize) -> Self {
        Self { patch_size }
    }
}

impl TransmissionRefiner for MeanRefiner {
    fn refine(&self, transmission: &ImageF64, guide: &ImageRgbF64) -> Result<ImageF64> {
        check_inputs("MeanRefiner::refine", transmission, guide, self.patch_size)?;
        debug!(
            "MeanRefiner::refine {}x{} patch={}",
            transmission.w, transmission.h, self.patch_size
        );
        box_blur(transmission, self.patch_size, self.patch_size)
    }

    fn name(&self) -> &'static str {
        "mean"
    }
}
