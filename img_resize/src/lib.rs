//! Batch half-dimension resizer for JPEG/PNG folders.
//!
//! One linear pipeline: resolve arguments, load every matching image in
//! the folder, resize each to half its dimensions, save into a timestamped
//! `converted-*` subfolder, report.

pub mod config;
pub mod errors;
pub mod pipeline;

pub use config::{filter_injected_flags, Cli, JobConfig, DEFAULT_FOLDER};
pub use errors::{ImgResizeError, Result};
pub use pipeline::{run, RunOutcome};
