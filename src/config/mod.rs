//! JSON configuration for the `haze_machine` binary.
pub mod batch;

pub use batch::{load_config, BatchConfig};
