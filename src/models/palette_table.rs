use eink_dither::{Palette, PaletteError};

/// Bytes in a full palette table: 256 RGB triples
pub const PALETTE_TABLE_LEN: usize = 768;

/// A palette as stored on disk: exactly 256 RGB triples.
///
/// Shorter files are padded with black, longer ones truncated, so any
/// byte string loads. Entry `i` is what a frame index `i` means to the
/// panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteTable {
    bytes: Box<[u8; PALETTE_TABLE_LEN]>,
}

impl PaletteTable {
    pub fn from_bytes(raw: &[u8]) -> Self {
        let mut bytes = Box::new([0u8; PALETTE_TABLE_LEN]);
        let n = raw.len().min(PALETTE_TABLE_LEN);
        bytes[..n].copy_from_slice(&raw[..n]);
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..]
    }

    /// Entry `idx` as `[r, g, b]`
    pub fn entry(&self, idx: u8) -> [u8; 3] {
        let i = idx as usize * 3;
        [self.bytes[i], self.bytes[i + 1], self.bytes[i + 2]]
    }

    /// Matching palette for the quantizer
    pub fn to_palette(&self) -> Result<Palette, PaletteError> {
        Palette::from_rgb_table(self.as_bytes())
    }
}
