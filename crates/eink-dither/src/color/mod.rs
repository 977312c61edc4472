//! Color types used by the quantizer.
//!
//! - [`Srgb`]: gamma-encoded channels, the form pixels arrive in and palette
//!   tables are written in.
//! - [`LinearRgb`]: light intensity. Quantization error is accumulated here.
//! - [`Oklab`]: perceptual space used to pick the nearest palette entry.
//!
//! ```
//! use eink_dither::{LinearRgb, Oklab, Srgb};
//!
//! let pixel = Srgb::from_u8(200, 120, 40);
//! let linear = LinearRgb::from(pixel);
//! let lab = Oklab::from(linear);
//! assert!(lab.l > 0.0 && lab.l < 1.0);
//! assert_eq!(Srgb::from(linear).to_bytes(), [200, 120, 40]);
//! ```

mod linear_rgb;
mod lut;
mod oklab;
mod srgb;

pub use linear_rgb::LinearRgb;
pub use oklab::Oklab;
pub use srgb::Srgb;
