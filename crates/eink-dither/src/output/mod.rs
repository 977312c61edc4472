//! Output types for the dithering pipeline.
//!
//! [`DitheredImage`] holds the palette indices produced by a dither call.
//! The [`nibble`] codec packs those indices two per byte, which is the frame
//! format 4-bit panels expect.

mod dithered_image;
pub mod nibble;

pub use dithered_image::DitheredImage;
pub use nibble::{pack_nibbles, packed_len, unpack_nibbles};
