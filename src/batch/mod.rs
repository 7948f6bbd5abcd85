//! Batch driver: run the executor over every image of one or two directories.
//!
//! One input directory means dehazing, two (images + depth maps) mean
//! augmenting. All directory checks (output empty, equal file lists, equal
//! names by sorted position) run before the first image is decoded, so a
//! mismatched batch writes nothing.
//!
//! Outputs keep the input file name. Dehazing also writes the dark channel
//! and the raw transmission as `<stem>_dc<ext>` and `<stem>_tr<ext>`.
mod dir;
mod driver;

pub use dir::{ensure_empty_dir, list_dir, output_names, OutputNames};
pub use driver::{produce, BatchOptions};
