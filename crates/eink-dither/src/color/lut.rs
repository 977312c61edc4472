//! Gamma conversion through the tables generated by `build.rs`.

include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

/// Look up `value` (clamped to 0.0..=1.0) in a 4096-entry table, linearly
/// interpolating between neighbouring entries.
#[inline]
fn interpolate(table: &[f32; 4096], value: f32) -> f32 {
    let scaled = value.clamp(0.0, 1.0) * 4095.0;
    let index = scaled as usize;
    if index >= 4095 {
        return table[4095];
    }
    let frac = scaled - index as f32;
    let a = table[index];
    a + (table[index + 1] - a) * frac
}

/// sRGB channel (0.0..=1.0) to linear light.
#[inline]
pub fn srgb_to_linear(srgb: f32) -> f32 {
    interpolate(&SRGB_TO_LINEAR, srgb)
}

/// Linear light (0.0..=1.0) to sRGB channel. Out-of-range input is clamped.
#[inline]
pub fn linear_to_srgb(linear: f32) -> f32 {
    interpolate(&LINEAR_TO_SRGB, linear)
}
