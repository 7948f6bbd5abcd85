#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod batch;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod executor;
pub mod haze_model;
pub mod image;
pub mod metrics;
pub mod types;

// Pipeline stages, usable on their own.
pub mod dcp;
pub mod filters;
pub mod refine;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{HazeError, Result};
pub use crate::executor::{AugmentOutput, DehazeOutput, Executor, ExecutorParams, ProcessOutput};
pub use crate::haze_model::{create_transmission, HazeModel};
pub use crate::types::{AtmosphericLight, ProcessingMode};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use haze_machine::prelude::*;
///
/// # fn main() -> haze_machine::Result<()> {
/// let hazy = ImageRgbF64::filled(64, 48, [0.6, 0.65, 0.7]);
/// let mut exec = Executor::with_default_params(vec![hazy], ProcessingMode::Dehazing)?;
/// let out = exec.process()?;
/// println!("{}x{}", out.image().w, out.image().h);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ImageF64, ImageRgbF64};
    pub use crate::{AtmosphericLight, Executor, ExecutorParams, HazeModel, ProcessingMode};
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    pub use crate::dcp::{dark_channel, estimate_atmospheric_light, estimate_transmission};
    pub use crate::refine::{refine, GuidedFilterRefiner, MeanRefiner, RefinerKind, TransmissionRefiner};

    pub use crate::diagnostics::{StageTiming, TimingBreakdown};
    pub use crate::metrics::{mse, ssim};
}
