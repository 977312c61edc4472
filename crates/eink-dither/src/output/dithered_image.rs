//! Dither result: palette indices plus the palette that produced them.

use crate::palette::Palette;

use super::nibble::pack_nibbles;

/// The output of the dithering pipeline.
///
/// Stores one `u8` palette index per pixel in row-major order, along with
/// the image dimensions and the palette used for dithering.
///
/// ```
/// use eink_dither::{DitheredImage, Palette, Srgb};
///
/// let palette = Palette::new(&[Srgb::from_u8(0, 0, 0), Srgb::from_u8(255, 255, 255)]).unwrap();
/// let image = DitheredImage::new(vec![0, 1, 1, 0], 2, 2, palette);
///
/// assert_eq!(image.to_rgb().len(), 2 * 2 * 3);
/// assert_eq!(image.to_packed(), vec![0x01, 0x10]);
/// ```
#[derive(Debug, Clone)]
pub struct DitheredImage {
    indices: Vec<u8>,
    width: usize,
    height: usize,
    palette: Palette,
}

impl DitheredImage {
    /// Wrap dithered indices. Each index must be below `palette.len()`.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `indices.len() == width * height`.
    pub fn new(indices: Vec<u8>, width: usize, height: usize, palette: Palette) -> Self {
        debug_assert_eq!(
            indices.len(),
            width * height,
            "indices length ({}) must match {}x{}",
            indices.len(),
            width,
            height,
        );
        Self {
            indices,
            width,
            height,
            palette,
        }
    }

    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<u8> {
        self.indices
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Render through the palette as `[R, G, B, R, G, B, ...]`.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.indices.len() * 3);
        for &idx in &self.indices {
            rgb.extend_from_slice(&self.palette.rgb(idx as usize));
        }
        rgb
    }

    /// Pack the indices two per byte, see [`pack_nibbles`].
    pub fn to_packed(&self) -> Vec<u8> {
        pack_nibbles(&self.indices)
    }
}
