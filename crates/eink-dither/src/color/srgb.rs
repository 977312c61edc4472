//! Gamma-encoded sRGB color.

use super::linear_rgb::LinearRgb;
use super::lut::linear_to_srgb;

/// A color in sRGB space with channels in 0.0..=1.0.
///
/// Decoded image pixels and palette table entries are both sRGB bytes;
/// this type is the bridge between those bytes and the float pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Srgb {
    #[inline]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from 8-bit channels.
    ///
    /// ```
    /// use eink_dither::Srgb;
    /// assert_eq!(Srgb::from_u8(255, 0, 0).r, 1.0);
    /// ```
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    #[inline]
    pub fn from_bytes([r, g, b]: [u8; 3]) -> Self {
        Self::from_u8(r, g, b)
    }

    /// Round and clamp back to 8-bit channels.
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [
            (self.r * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.g * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.b * 255.0).round().clamp(0.0, 255.0) as u8,
        ]
    }
}

impl From<LinearRgb> for Srgb {
    fn from(linear: LinearRgb) -> Self {
        Self {
            r: linear_to_srgb(linear.r),
            g: linear_to_srgb(linear.g),
            b: linear_to_srgb(linear.b),
        }
    }
}
