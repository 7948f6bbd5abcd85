//! Executor: validates the inputs of one processing run and drives a pipeline.
//!
//! Overview
//! - Dehazing (one image): dark channel → atmospheric light → raw
//!   transmission → refinement → inverse haze model. The dark channel and the
//!   raw transmission are returned alongside the recovered image because they
//!   are useful diagnostics on their own.
//! - Augmenting (image + depth map): sample a scattering coefficient β and a
//!   grey atmospheric light level, blur and floor the depth, convert it to
//!   transmission with Beer-Lambert and apply the forward haze model.
//!
//! Modules
//! - [`params`]: knobs for both pipelines, deserializable from JSON.
//! - `pipeline`: the [`Executor`] itself and its output types.
//!
//! Randomness comes from a [`rand::rngs::StdRng`] owned by each executor and
//! seeded from [`ExecutorParams::seed`] when given, so runs are reproducible
//! and executors can live on different threads without sharing state.

pub mod params;
mod pipeline;

pub use params::ExecutorParams;
pub use pipeline::{AugmentOutput, DehazeOutput, Executor, ProcessOutput, DEPTH_CHANNEL};
