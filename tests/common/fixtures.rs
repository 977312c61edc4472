//! Test fixtures and constants.

use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Session tokens used across tests
pub mod identities {
    pub const ALICE: &str = "alice";
    pub const BOB: &str = "bob";
}

/// Palette names shipped with the embedded assets
pub mod palettes {
    pub const SPECTRA6: &str = "spectra6.act";
    pub const BW: &str = "bw.act";
}

pub fn encode(image: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, format)
        .expect("Failed to encode fixture image");
    buf.into_inner()
}

/// Single-color PNG
pub fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    encode(&RgbImage::from_pixel(width, height, Rgb(rgb)), ImageFormat::Png)
}

/// Horizontal black-to-white ramp
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, _| {
        let v = (x * 255 / (width - 1).max(1)) as u8;
        Rgb([v, v, v])
    });
    encode(&img, ImageFormat::Png)
}

/// Colorful test card with hue across x and brightness down y
pub fn color_card_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width) as u8;
        let g = (y * 255 / height) as u8;
        let b = 255 - r / 2;
        Rgb([r, g, b])
    });
    encode(&img, ImageFormat::Jpeg)
}
