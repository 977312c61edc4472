//! Linear-light RGB color.

use super::lut::srgb_to_linear;
use super::srgb::Srgb;

/// A color in linear RGB, proportional to emitted light.
///
/// Error diffusion adds and subtracts colors, which is only physically
/// meaningful in linear light. Values may leave 0.0..=1.0 while error is
/// being accumulated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl LinearRgb {
    #[inline]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Per-channel difference `self - other`.
    #[inline]
    pub fn difference(self, other: LinearRgb) -> [f32; 3] {
        [self.r - other.r, self.g - other.g, self.b - other.b]
    }

    /// Add an accumulated error, clamping each channel to
    /// `-max_error..=1.0 + max_error`.
    #[inline]
    pub fn with_error(self, error: [f32; 3], max_error: f32) -> Self {
        let clamp = |v: f32| v.clamp(-max_error, 1.0 + max_error);
        Self {
            r: clamp(self.r + error[0]),
            g: clamp(self.g + error[1]),
            b: clamp(self.b + error[2]),
        }
    }
}

impl From<Srgb> for LinearRgb {
    fn from(srgb: Srgb) -> Self {
        Self {
            r: srgb_to_linear(srgb.r),
            g: srgb_to_linear(srgb.g),
            b: srgb_to_linear(srgb.b),
        }
    }
}
