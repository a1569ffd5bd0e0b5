//! Shared utilities for the img-resize batch tool.
//!
//! This crate provides the support layer under the `img-resize` binary:
//! - Diagnostic logging bootstrap (tracing, file appender + stderr)
//! - Run log: the user-facing status lines of one execution, buffered for
//!   persistence as `stats.log`
//! - Batch file collection and result accounting
//! - Summary reporting
//! - DPI/resolution metadata handling (JFIF APP0 / PNG pHYs)
//! - Type-safe JPEG quality wrapper

pub mod batch;
pub mod density;
pub mod logging;
pub mod report;
pub mod run_log;
pub mod types;

pub use batch::{collect_files, has_extension, BatchResult, IMAGE_EXTENSIONS};
pub use density::{apply_density, read_density, Density, JfifDensity, PngPhys};
pub use report::{format_duration, print_summary_report};
pub use run_log::{RunLog, STATS_LOG_NAME};
pub use types::{JpegQuality, QualityError, QUALITY_DEFAULT, QUALITY_MAX, QUALITY_MIN};
