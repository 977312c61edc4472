//! Unified error type for the eink-dither public API.

use crate::palette::PaletteError;
use std::fmt;

/// Errors returned by [`EinkDitherer`](crate::EinkDitherer).
///
/// ```
/// use eink_dither::{DitherError, Palette};
///
/// fn load(table: &[u8]) -> Result<Palette, DitherError> {
///     Ok(Palette::from_rgb_table(table)?)
/// }
/// assert!(load(&[]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DitherError {
    /// Palette validation error
    Palette(PaletteError),
    /// Pixel buffer does not hold `width * height` pixels
    DimensionMismatch { expected: usize, actual: usize },
}

impl fmt::Display for DitherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DitherError::Palette(err) => write!(f, "palette error: {}", err),
            DitherError::DimensionMismatch { expected, actual } => write!(
                f,
                "pixel buffer holds {} pixels, dimensions require {}",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for DitherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DitherError::Palette(err) => Some(err),
            DitherError::DimensionMismatch { .. } => None,
        }
    }
}

impl From<PaletteError> for DitherError {
    fn from(err: PaletteError) -> Self {
        DitherError::Palette(err)
    }
}
