//! Serializable diagnostics produced by the executor and the batch driver.
//!
//! `ImageReport` summarises one processed image (sizes, estimated or sampled
//! parameters, per-stage timings). `BatchReport` collects them for a whole run
//! and is what the binary writes with `--report`.

pub mod report;
pub mod timing;

pub use report::{BatchReport, ImageReport, MapSummary};
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
