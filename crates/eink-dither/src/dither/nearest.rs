//! Nearest-color quantization without diffusion.

use crate::color::{LinearRgb, Oklab};
use crate::palette::Palette;

use super::{Dither, DitherOptions};

/// Map every pixel independently to its nearest palette entry.
pub struct NearestColor;

impl Dither for NearestColor {
    fn dither(
        &self,
        image: &[LinearRgb],
        width: usize,
        height: usize,
        palette: &Palette,
        _options: &DitherOptions,
    ) -> Vec<u8> {
        debug_assert_eq!(image.len(), width * height);
        image
            .iter()
            .map(|&pixel| palette.find_nearest(Oklab::from(pixel)).0 as u8)
            .collect()
    }
}
