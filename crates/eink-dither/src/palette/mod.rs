//! Palette tables and nearest-color matching.

mod error;
mod palette;

pub use error::PaletteError;
pub use palette::{DistanceMetric, Palette, MAX_PALETTE_LEN};
