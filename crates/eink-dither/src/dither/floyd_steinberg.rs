//! Floyd-Steinberg error diffusion.

use crate::color::LinearRgb;
use crate::palette::Palette;

use super::{dither_with_kernel, Dither, DitherOptions, FLOYD_STEINBERG};

/// Floyd-Steinberg error diffusion.
///
/// Sends 7/16 of each pixel's quantization error right, 3/16 below-left,
/// 5/16 below and 1/16 below-right, so the average color of a region is
/// preserved instead of collapsing to the nearest palette entry.
pub struct FloydSteinberg;

impl Dither for FloydSteinberg {
    fn dither(
        &self,
        image: &[LinearRgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        dither_with_kernel(image, width, height, palette, &FLOYD_STEINBERG, options)
    }
}
