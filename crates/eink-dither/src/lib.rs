#![allow(clippy::excessive_precision, clippy::module_inception)]

//! eink-dither: palette quantization for e-paper panels
//!
//! Converts sRGB pixels into palette indices with gamma-correct error
//! diffusion, and packs those indices into the 4-bit frames that
//! Spectra-class panels consume.
//!
//! # Quick Start
//!
//! ```
//! use eink_dither::{pack_nibbles, EinkDitherer, Palette, Srgb};
//!
//! let palette = Palette::from_rgb_table(&[0, 0, 0, 255, 255, 255]).unwrap();
//! let ditherer = EinkDitherer::new(palette);
//!
//! let pixels = vec![Srgb::from_u8(255, 255, 255); 4];
//! let result = ditherer.dither(&pixels, 2, 2).unwrap();
//! assert_eq!(result.indices(), &[1, 1, 1, 1]);
//! assert_eq!(pack_nibbles(result.indices()), vec![0x11, 0x11]);
//! ```
//!
//! # Color Spaces
//!
//! | Color Space | Key Property | Used For |
//! |-------------|--------------|----------|
//! | [`Srgb`] | Standard encoding (IEC 61966-2-1) | Input pixels, palette tables, previews |
//! | [`LinearRgb`] | Proportional to light intensity | Error accumulation and diffusion |
//! | [`Oklab`] | Perceptually uniform distances | Palette matching via [`Palette::find_nearest()`] |
//!
//! ## Pipeline
//!
//! ```text
//! sRGB input
//!     |
//!     v
//! LinearRgb                    (gamma decode via LUT)
//!     |
//!     v
//! pixel + accumulated error    (LinearRgb, clamped)
//!     |
//!     +---> Oklab ---> find_nearest() ---> palette index
//!     |
//!     v
//! error = pixel - palette[idx] (LinearRgb)
//!     |
//!     v
//! diffuse 7/16, 3/16, 5/16, 1/16 to unvisited neighbours
//! ```
//!
//! ## Matching
//!
//! Grey-only palettes match by squared Euclidean distance in Oklab. Once a
//! palette holds a chromatic ink, plain Euclidean distance sends light
//! greys to yellow (Oklab L 0.97 against white's 1.0), so
//! [`Palette::new`] switches to HyAB with a chroma-coupling term:
//!
//! ```text
//! d = 2.0 * |dL| + 1.0 * sqrt(da^2 + db^2) + 10.0 * |C_pixel - C_entry|
//! ```
//!
//! The last term keeps achromatic pixels on black and white. See
//! [`DistanceMetric`].
//!
//! ## Error in Linear Light
//!
//! The quantization error is a difference in emitted light, and light adds
//! linearly. Accumulating it in sRGB would over-weight dark tones: a flat
//! sRGB 128 field dithered to black and white must come out about 21%
//! white, not 50%.

pub mod api;
pub mod color;
pub mod dither;
pub mod output;
pub mod palette;

#[cfg(test)]
mod domain_tests;

pub use api::{DitherError, EinkDitherer};
pub use color::{LinearRgb, Oklab, Srgb};
pub use dither::{Dither, DitherAlgorithm, DitherOptions, FloydSteinberg, NearestColor};
pub use output::{pack_nibbles, packed_len, unpack_nibbles, DitheredImage};
pub use palette::{DistanceMetric, Palette, PaletteError, MAX_PALETTE_LEN};
