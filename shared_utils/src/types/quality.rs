//! JPEG quality type-safe wrapper.
//!
//! The quality value is validated once at construction, so the encode path
//! never has to re-check the range.

use std::fmt;
use thiserror::Error;

/// Lowest accepted JPEG quality.
pub const QUALITY_MIN: u8 = 1;
/// Highest accepted JPEG quality.
pub const QUALITY_MAX: u8 = 100;
/// Default JPEG quality when the argument is absent or invalid.
pub const QUALITY_DEFAULT: u8 = 90;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QualityError {
    #[error("JPEG quality {0} out of range [{QUALITY_MIN}, {QUALITY_MAX}]")]
    OutOfRange(i64),

    #[error("JPEG quality is not a number: {0:?}")]
    NotANumber(String),
}

/// Validated JPEG quality in `[QUALITY_MIN, QUALITY_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct JpegQuality(u8);

impl JpegQuality {
    /// Create a quality value, validating the range.
    pub fn new(value: u8) -> Result<Self, QualityError> {
        if value < QUALITY_MIN || value > QUALITY_MAX {
            return Err(QualityError::OutOfRange(value as i64));
        }
        Ok(Self(value))
    }

    /// Parse a quality value from a raw argument string.
    pub fn parse(raw: &str) -> Result<Self, QualityError> {
        let value: i64 = raw
            .trim()
            .parse()
            .map_err(|_| QualityError::NotANumber(raw.to_string()))?;
        if value < QUALITY_MIN as i64 || value > QUALITY_MAX as i64 {
            return Err(QualityError::OutOfRange(value));
        }
        Ok(Self(value as u8))
    }

    /// Clamp to the valid range instead of returning an error.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(QUALITY_MIN as i64, QUALITY_MAX as i64) as u8)
    }

    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for JpegQuality {
    fn default() -> Self {
        Self(QUALITY_DEFAULT)
    }
}

impl fmt::Display for JpegQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
