//! Error diffusion kernels.

/// An error diffusion kernel.
///
/// Each entry `(dx, dy, weight)` sends `error * weight / divisor` to the
/// pixel at offset `(dx, dy)`. `dy` is never negative and `dx` is mirrored
/// on reversed rows when scanning serpentine.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    pub entries: &'static [(i32, i32, u8)],
    pub divisor: u8,
    /// Largest `dy`; the error buffer holds `max_dy + 1` rows.
    pub max_dy: usize,
}

impl Kernel {
    /// Sum of weights over the divisor: 1.0 means all error is propagated.
    pub fn propagation(&self) -> f32 {
        let total: u32 = self.entries.iter().map(|&(_, _, w)| w as u32).sum();
        total as f32 / self.divisor as f32
    }
}

/// Floyd-Steinberg kernel, 100% propagation.
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
    max_dy: 1,
};
