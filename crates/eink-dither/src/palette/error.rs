//! Error type for palette construction.

use std::fmt;

/// Returned when a color list cannot be turned into a [`Palette`](super::Palette).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// No colors provided
    EmptyPalette,
    /// More entries than an 8-bit index can address
    TooManyColors {
        /// Number of colors supplied
        len: usize,
    },
    /// A raw RGB table whose length is not a multiple of three
    PartialEntry {
        /// Byte length of the rejected table
        len: usize,
    },
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::EmptyPalette => write!(f, "palette cannot be empty"),
            PaletteError::TooManyColors { len } => {
                write!(f, "palette has {} colors, at most 256 are addressable", len)
            }
            PaletteError::PartialEntry { len } => {
                write!(f, "rgb table of {} bytes ends in a partial entry", len)
            }
        }
    }
}

impl std::error::Error for PaletteError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            PaletteError::EmptyPalette.to_string(),
            "palette cannot be empty"
        );
        assert_eq!(
            PaletteError::TooManyColors { len: 300 }.to_string(),
            "palette has 300 colors, at most 256 are addressable"
        );
        assert_eq!(
            PaletteError::PartialEntry { len: 7 }.to_string(),
            "rgb table of 7 bytes ends in a partial entry"
        );
    }
}
