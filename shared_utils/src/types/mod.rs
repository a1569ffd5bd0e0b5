//! Type-safe wrappers for values with validated ranges.

pub mod quality;

pub use quality::{JpegQuality, QualityError, QUALITY_DEFAULT, QUALITY_MAX, QUALITY_MIN};
