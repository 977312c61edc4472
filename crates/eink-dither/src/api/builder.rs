//! EinkDitherer builder, the primary entry point for the crate.

use crate::color::{LinearRgb, Srgb};
use crate::dither::{DitherAlgorithm, DitherOptions};
use crate::output::DitheredImage;
use crate::palette::{DistanceMetric, Palette};

use super::DitherError;

/// High-level dithering builder for e-ink panels.
///
/// - Constructor requires a [`Palette`] (no invalid states)
/// - Configuration methods consume and return `self`
/// - [`dither()`](Self::dither) takes `&self`, so one builder serves many images
///
/// ```
/// use eink_dither::{DitherAlgorithm, EinkDitherer, Palette, Srgb};
///
/// let palette = Palette::new(&[Srgb::from_u8(0, 0, 0), Srgb::from_u8(255, 255, 255)]).unwrap();
/// let ditherer = EinkDitherer::new(palette)
///     .algorithm(DitherAlgorithm::FloydSteinberg)
///     .serpentine(false);
///
/// let pixels = vec![Srgb::from_u8(128, 128, 128); 4];
/// let result = ditherer.dither(&pixels, 2, 2).unwrap();
/// assert_eq!(result.indices().len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct EinkDitherer {
    palette: Palette,
    dither_opts: DitherOptions,
    algorithm: DitherAlgorithm,
}

impl EinkDitherer {
    /// Create a ditherer using Floyd-Steinberg and default options.
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            dither_opts: DitherOptions::default(),
            algorithm: DitherAlgorithm::default(),
        }
    }

    #[inline]
    pub fn algorithm(mut self, algorithm: DitherAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.dither_opts = self.dither_opts.serpentine(enabled);
        self
    }

    #[inline]
    pub fn error_clamp(mut self, clamp: f32) -> Self {
        self.dither_opts = self.dither_opts.error_clamp(clamp);
        self
    }

    /// Override the palette's auto-detected distance metric.
    #[inline]
    pub fn distance_metric(mut self, metric: DistanceMetric) -> Self {
        self.palette = self.palette.with_distance_metric(metric);
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Dither sRGB pixels (row-major, `width * height` of them).
    ///
    /// Pixels are linearized through the gamma LUT, quantized by the
    /// selected algorithm, and returned with a copy of the palette.
    pub fn dither(
        &self,
        pixels: &[Srgb],
        width: usize,
        height: usize,
    ) -> Result<DitheredImage, DitherError> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(DitherError::DimensionMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        let linear: Vec<LinearRgb> = pixels.iter().map(|&p| LinearRgb::from(p)).collect();
        let indices = self
            .algorithm
            .run(&linear, width, height, &self.palette, &self.dither_opts);

        Ok(DitheredImage::new(indices, width, height, self.palette.clone()))
    }

    /// Like [`dither`](Self::dither) for packed `R G B` bytes, the layout
    /// image decoders hand out.
    pub fn dither_rgb8(
        &self,
        rgb: &[u8],
        width: usize,
        height: usize,
    ) -> Result<DitheredImage, DitherError> {
        if rgb.len() != width * height * 3 {
            return Err(DitherError::DimensionMismatch {
                expected: width * height,
                actual: rgb.len() / 3,
            });
        }
        let pixels: Vec<Srgb> = rgb
            .chunks_exact(3)
            .map(|c| Srgb::from_u8(c[0], c[1], c[2]))
            .collect();
        self.dither(&pixels, width, height)
    }
}
