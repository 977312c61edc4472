//! Assertion helpers for tests.

use pretty_assertions::assert_eq;

use inkpress::models::CanvasSpec;

/// Assert bytes are a PNG of the canvas size
pub fn assert_png_preview(bytes: &[u8], spec: CanvasSpec) {
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G']),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
    let image = image::load_from_memory(bytes).expect("preview decodes");
    assert_eq!(
        (image.width(), image.height()),
        (spec.width, spec.height),
        "preview dimensions"
    );
}

/// Assert a packed frame has the exact size for the canvas
pub fn assert_frame_size(frame: &[u8], spec: CanvasSpec) {
    assert_eq!(
        frame.len(),
        spec.pixels().div_ceil(2),
        "frame size for {}x{}",
        spec.width,
        spec.height
    );
}

/// Assert every nibble of a frame is one of `allowed`
pub fn assert_frame_uses_only(frame: &[u8], allowed: &[u8]) {
    for (i, byte) in frame.iter().enumerate() {
        for nibble in [byte >> 4, byte & 0x0F] {
            assert!(
                allowed.contains(&nibble),
                "byte {i} ({byte:#04x}) holds index {nibble}, allowed {allowed:?}"
            );
        }
    }
}
