use crate::error::DispatchError;

/// Fixed target geometry of a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSpec {
    pub width: u32,
    pub height: u32,
}

impl CanvasSpec {
    /// 13.3" Spectra 6 panel, portrait: 1200x1600
    pub const SPECTRA_13IN3: Self = Self {
        width: 1200,
        height: 1600,
    };

    pub fn pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size of a packed 4-bit frame for this canvas
    pub fn buffer_len(&self) -> usize {
        eink_dither::packed_len(self.pixels())
    }

    /// Check that a raw frame fits this canvas exactly
    pub fn validate_buffer(&self, len: usize) -> Result<(), DispatchError> {
        let expected = self.buffer_len();
        if len != expected {
            Err(DispatchError::BufferSize {
                expected,
                actual: len,
            })
        } else {
            Ok(())
        }
    }
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self::SPECTRA_13IN3
    }
}
