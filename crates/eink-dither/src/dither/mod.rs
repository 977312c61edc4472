//! Palette quantization with error diffusion.
//!
//! Every algorithm implements [`Dither`]: it takes linear-light pixels and
//! returns one palette index per pixel. [`FloydSteinberg`] diffuses the
//! quantization error to unvisited neighbours; [`NearestColor`] maps each
//! pixel on its own and exists mostly as a baseline.
//!
//! ```
//! use eink_dither::{Dither, DitherOptions, FloydSteinberg, LinearRgb, Palette, Srgb};
//!
//! let palette = Palette::new(&[Srgb::from_u8(0, 0, 0), Srgb::from_u8(255, 255, 255)]).unwrap();
//! let pixels = vec![LinearRgb::new(0.5, 0.5, 0.5); 16];
//! let indices = FloydSteinberg.dither(&pixels, 4, 4, &palette, &DitherOptions::new());
//! assert_eq!(indices.len(), 16);
//! ```

mod floyd_steinberg;
mod kernel;
mod nearest;
mod options;

pub use floyd_steinberg::FloydSteinberg;
pub use kernel::{Kernel, FLOYD_STEINBERG};
pub use nearest::NearestColor;
pub use options::DitherOptions;

use crate::color::{LinearRgb, Oklab};
use crate::palette::Palette;

/// Algorithm selection for the [`EinkDitherer`](crate::EinkDitherer) builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherAlgorithm {
    /// Floyd-Steinberg error diffusion (7/16, 3/16, 5/16, 1/16).
    #[default]
    FloydSteinberg,

    /// Plain nearest-color mapping, no diffusion. Shows banding on
    /// gradients; useful for comparison.
    None,
}

impl DitherAlgorithm {
    /// Run the selected algorithm.
    pub fn run(
        self,
        image: &[LinearRgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        match self {
            DitherAlgorithm::FloydSteinberg => {
                FloydSteinberg.dither(image, width, height, palette, options)
            }
            DitherAlgorithm::None => NearestColor.dither(image, width, height, palette, options),
        }
    }
}

/// Quantize an image to palette indices.
pub trait Dither {
    /// Map `image` (linear RGB, row-major, `width * height` pixels) to one
    /// palette index per pixel, in the same order. Every index is below
    /// `palette.len()`.
    fn dither(
        &self,
        image: &[LinearRgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8>;
}

/// Sliding window of pending error rows.
///
/// Holds only the rows a kernel can reach, so memory stays at
/// `(max_dy + 1) * width` regardless of image height. One buffer belongs to
/// one dither call.
#[derive(Debug)]
pub struct ErrorBuffer {
    /// rows[0] is the current row, rows[1] the next one, and so on.
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    pub fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![[0.0; 3]; width]).collect(),
            width,
        }
    }

    /// Error accumulated so far for pixel `x` of the current row.
    #[inline]
    pub fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add error to pixel `x`, `row_offset` rows below the current one.
    /// Out-of-range targets are ignored.
    #[inline]
    pub fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 3]) {
        if x < self.width && row_offset < self.rows.len() {
            let cell = &mut self.rows[row_offset][x];
            for c in 0..3 {
                cell[c] += error[c];
            }
        }
    }

    /// Drop the current row and open a zeroed row at the bottom.
    pub fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}

/// Error diffusion loop shared by the kernel-based algorithms.
///
/// For each pixel in scan order: add the error accumulated from earlier
/// pixels, pick the nearest palette entry in Oklab, then spread the
/// remaining linear-light error over the kernel's unvisited neighbours.
pub(crate) fn dither_with_kernel(
    image: &[LinearRgb],
    width: usize,
    height: usize,
    palette: &Palette,
    kernel: &Kernel,
    options: &DitherOptions,
) -> Vec<u8> {
    let mut output = vec![0u8; width * height];
    let mut error_buf = ErrorBuffer::new(width, kernel.max_dy + 1);
    let divisor = kernel.divisor as f32;

    for y in 0..height {
        let reverse = options.serpentine && y % 2 == 1;

        for step in 0..width {
            let x = if reverse { width - 1 - step } else { step };
            let idx = y * width + x;

            let pixel = image[idx].with_error(error_buf.get_accumulated(x), options.error_clamp);
            let (nearest, _) = palette.find_nearest(Oklab::from(pixel));
            output[idx] = nearest as u8;

            let error = pixel.difference(palette.linear(nearest));
            for &(dx, dy, weight) in kernel.entries {
                let dx = if reverse { -dx } else { dx };
                let nx = x as i64 + dx as i64;
                let ny = y + dy as usize;
                if nx < 0 || nx as usize >= width || ny >= height {
                    continue;
                }
                let share = weight as f32 / divisor;
                error_buf.add_error(
                    nx as usize,
                    dy as usize,
                    [error[0] * share, error[1] * share, error[2] * share],
                );
            }
        }

        error_buf.advance_row();
    }

    output
}
