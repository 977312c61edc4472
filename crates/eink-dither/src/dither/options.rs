//! Error diffusion configuration.

/// Options shared by the error diffusion algorithms.
///
/// ```
/// use eink_dither::DitherOptions;
///
/// let options = DitherOptions::new().serpentine(true).error_clamp(0.3);
/// assert!(options.serpentine);
/// ```
#[derive(Debug, Clone)]
pub struct DitherOptions {
    /// Alternate scan direction on odd rows, mirroring the kernel.
    ///
    /// Default: `false` (every row left to right)
    pub serpentine: bool,

    /// Accumulated error may push a channel at most this far outside
    /// 0.0..=1.0 (linear light). Stops runaway blooming on sparse palettes.
    ///
    /// Default: `0.5`
    pub error_clamp: f32,
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self {
            serpentine: false,
            error_clamp: 0.5,
        }
    }
}

impl DitherOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.serpentine = enabled;
        self
    }

    #[inline]
    pub fn error_clamp(mut self, clamp: f32) -> Self {
        self.error_clamp = clamp;
        self
    }
}
