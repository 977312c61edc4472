//! Palette storage with precomputed color spaces and nearest-color lookup.

use std::collections::HashSet;

use super::error::PaletteError;
use crate::color::{LinearRgb, Oklab, Srgb};

/// Largest palette an 8-bit index can address.
pub const MAX_PALETTE_LEN: usize = 256;

/// Distance metric used by [`Palette::find_nearest`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DistanceMetric {
    /// Squared Euclidean distance in Oklab.
    ///
    /// Right for grey-only palettes. With chromatic palettes, light greys
    /// can land on a chromatic entry of similar lightness (yellow vs. white).
    #[default]
    Euclidean,

    /// HyAB distance with a chroma-coupling term (Abasi et al., 2020).
    ///
    /// `kl * |dL| + kc * sqrt(da² + db²) + kchroma * |C_pixel - C_entry|`
    ///
    /// The coupling term keeps achromatic pixels on achromatic entries.
    HyAB {
        /// Lightness weight
        kl: f32,
        /// Chrominance weight
        kc: f32,
        /// Chroma-magnitude coupling weight
        kchroma: f32,
    },
}

impl DistanceMetric {
    /// Weights used when a chromatic palette is detected.
    pub const HYAB_DEFAULT: DistanceMetric = DistanceMetric::HyAB {
        kl: 2.0,
        kc: 1.0,
        kchroma: 10.0,
    };
}

/// Entries with Oklab chroma above this count as chromatic. Pure greys have
/// chroma 0; intentional panel colors sit well above 0.05.
const CHROMA_DETECTION_THRESHOLD: f32 = 0.03;

/// An ordered table of up to 256 colors.
///
/// Entries may repeat. Zero-padded palette files, for instance, end in a run
/// of black entries. Lookups only consider the first occurrence of each
/// distinct color, so a tie always resolves to the lowest index and the
/// padding never costs matching time.
///
/// ```
/// use eink_dither::{Palette, Srgb};
///
/// let palette = Palette::new(&[
///     Srgb::from_u8(0, 0, 0),
///     Srgb::from_u8(255, 255, 255),
///     Srgb::from_u8(0, 0, 0),
/// ])
/// .unwrap();
/// assert_eq!(palette.len(), 3);
/// assert_eq!(palette.distinct_len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Palette {
    srgb: Vec<Srgb>,
    bytes: Vec<[u8; 3]>,
    linear: Vec<LinearRgb>,
    oklab: Vec<Oklab>,
    chroma: Vec<f32>,
    /// Index of the first occurrence of every distinct color, ascending.
    candidates: Vec<usize>,
    distance_metric: DistanceMetric,
}

impl Palette {
    /// Build a palette from sRGB colors.
    ///
    /// The distance metric is chosen from the content: HyAB with chroma
    /// coupling when any entry is chromatic, Euclidean otherwise.
    pub fn new(colors: &[Srgb]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        if colors.len() > MAX_PALETTE_LEN {
            return Err(PaletteError::TooManyColors { len: colors.len() });
        }

        let srgb = colors.to_vec();
        let bytes: Vec<[u8; 3]> = srgb.iter().map(|c| c.to_bytes()).collect();
        let linear: Vec<LinearRgb> = srgb.iter().map(|&c| LinearRgb::from(c)).collect();
        let oklab: Vec<Oklab> = linear.iter().map(|&c| Oklab::from(c)).collect();
        let chroma: Vec<f32> = oklab.iter().map(|c| c.chroma()).collect();

        let mut seen = HashSet::new();
        let candidates = bytes
            .iter()
            .enumerate()
            .filter(|(_, b)| seen.insert(**b))
            .map(|(i, _)| i)
            .collect();

        let distance_metric = if chroma.iter().any(|&c| c > CHROMA_DETECTION_THRESHOLD) {
            DistanceMetric::HYAB_DEFAULT
        } else {
            DistanceMetric::Euclidean
        };

        Ok(Self {
            srgb,
            bytes,
            linear,
            oklab,
            chroma,
            candidates,
            distance_metric,
        })
    }

    /// Build a palette from packed `R G B R G B ...` bytes.
    ///
    /// ```
    /// use eink_dither::Palette;
    ///
    /// let palette = Palette::from_rgb_table(&[0, 0, 0, 255, 255, 255]).unwrap();
    /// assert_eq!(palette.rgb(1), [255, 255, 255]);
    /// ```
    pub fn from_rgb_table(table: &[u8]) -> Result<Self, PaletteError> {
        if table.len() % 3 != 0 {
            return Err(PaletteError::PartialEntry { len: table.len() });
        }
        let colors: Vec<Srgb> = table
            .chunks_exact(3)
            .map(|c| Srgb::from_u8(c[0], c[1], c[2]))
            .collect();
        Self::new(&colors)
    }

    /// Number of entries, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.srgb.len()
    }

    /// Always false; empty palettes are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.srgb.is_empty()
    }

    /// Number of distinct colors.
    #[inline]
    pub fn distinct_len(&self) -> usize {
        self.candidates.len()
    }

    /// Entry as 8-bit channels, exactly as it was written in the table.
    #[inline]
    pub fn rgb(&self, idx: usize) -> [u8; 3] {
        self.bytes[idx]
    }

    #[inline]
    pub fn linear(&self, idx: usize) -> LinearRgb {
        self.linear[idx]
    }

    #[inline]
    pub fn oklab(&self, idx: usize) -> Oklab {
        self.oklab[idx]
    }

    /// Override the auto-detected distance metric.
    pub fn with_distance_metric(mut self, metric: DistanceMetric) -> Self {
        self.distance_metric = metric;
        self
    }

    #[inline]
    pub fn distance_metric(&self) -> DistanceMetric {
        self.distance_metric
    }

    /// True if any entry has noticeable chroma.
    pub fn is_chromatic(&self) -> bool {
        self.chroma.iter().any(|&c| c > CHROMA_DETECTION_THRESHOLD)
    }

    /// Distance between a pixel and palette entry `idx` under the configured metric.
    #[inline]
    pub fn distance(&self, pixel: Oklab, pixel_chroma: f32, idx: usize) -> f32 {
        let entry = self.oklab[idx];
        match self.distance_metric {
            DistanceMetric::Euclidean => pixel.distance_squared(entry),
            DistanceMetric::HyAB { kl, kc, kchroma } => {
                let dl = (pixel.l - entry.l).abs();
                let da = pixel.a - entry.a;
                let db = pixel.b - entry.b;
                kl * dl
                    + kc * (da * da + db * db).sqrt()
                    + kchroma * (pixel_chroma - self.chroma[idx]).abs()
            }
        }
    }

    /// Find the entry closest to `color`, returning `(index, distance)`.
    ///
    /// Ties resolve to the lowest index.
    #[inline]
    pub fn find_nearest(&self, color: Oklab) -> (usize, f32) {
        let pixel_chroma = color.chroma();
        let mut best_idx = self.candidates[0];
        let mut best_dist = f32::MAX;
        for &i in &self.candidates {
            let dist = self.distance(color, pixel_chroma, i);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }
        (best_idx, best_dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bw() -> Palette {
        Palette::new(&[Srgb::from_u8(0, 0, 0), Srgb::from_u8(255, 255, 255)]).unwrap()
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert_eq!(Palette::new(&[]).unwrap_err(), PaletteError::EmptyPalette);
    }

    #[test]
    fn test_too_many_colors_rejected() {
        let colors = vec![Srgb::from_u8(1, 2, 3); 257];
        assert_eq!(
            Palette::new(&colors).unwrap_err(),
            PaletteError::TooManyColors { len: 257 }
        );
    }

    #[test]
    fn test_full_256_entry_table_accepted() {
        let table = vec![0u8; 768];
        let palette = Palette::from_rgb_table(&table).unwrap();
        assert_eq!(palette.len(), 256);
        assert_eq!(palette.distinct_len(), 1);
    }

    #[test]
    fn test_partial_entry_rejected() {
        assert_eq!(
            Palette::from_rgb_table(&[0, 0, 0, 255]).unwrap_err(),
            PaletteError::PartialEntry { len: 4 }
        );
    }

    #[test]
    fn test_find_nearest_grey_levels() {
        let palette = bw();
        let dark = Oklab::from(LinearRgb::from(Srgb::from_u8(50, 50, 50)));
        let light = Oklab::from(LinearRgb::from(Srgb::from_u8(220, 220, 220)));
        assert_eq!(palette.find_nearest(dark).0, 0);
        assert_eq!(palette.find_nearest(light).0, 1);
    }

    #[test]
    fn test_exact_match_has_zero_distance() {
        let palette = bw();
        let (idx, dist) = palette.find_nearest(palette.oklab(1));
        assert_eq!(idx, 1);
        assert!(dist < 1e-6);
    }

    #[test]
    fn test_duplicates_resolve_to_first_occurrence() {
        // white, black, white, black: only indices 0 and 1 are ever returned
        let table = [255, 255, 255, 0, 0, 0, 255, 255, 255, 0, 0, 0];
        let palette = Palette::from_rgb_table(&table).unwrap();
        assert_eq!(palette.distinct_len(), 2);

        let white = Oklab::from(LinearRgb::new(1.0, 1.0, 1.0));
        let black = Oklab::from(LinearRgb::new(0.0, 0.0, 0.0));
        assert_eq!(palette.find_nearest(white).0, 0);
        assert_eq!(palette.find_nearest(black).0, 1);
    }

    #[test]
    fn test_metric_auto_detection() {
        assert_eq!(bw().distance_metric(), DistanceMetric::Euclidean);
        assert!(!bw().is_chromatic());

        let color = Palette::new(&[
            Srgb::from_u8(0, 0, 0),
            Srgb::from_u8(255, 255, 255),
            Srgb::from_u8(255, 0, 0),
        ])
        .unwrap();
        assert!(color.is_chromatic());
        assert_eq!(color.distance_metric(), DistanceMetric::HYAB_DEFAULT);
    }

    #[test]
    fn test_hyab_keeps_light_grey_off_yellow() {
        let palette = Palette::new(&[
            Srgb::from_u8(0, 0, 0),
            Srgb::from_u8(255, 255, 255),
            Srgb::from_u8(255, 255, 0),
        ])
        .unwrap();
        let light_grey = Oklab::from(LinearRgb::from(Srgb::from_u8(235, 235, 235)));
        assert_eq!(palette.find_nearest(light_grey).0, 1);
    }

    #[test]
    fn test_metric_override() {
        let palette = Palette::new(&[Srgb::from_u8(0, 0, 0), Srgb::from_u8(255, 0, 0)])
            .unwrap()
            .with_distance_metric(DistanceMetric::Euclidean);
        assert_eq!(palette.distance_metric(), DistanceMetric::Euclidean);
    }

    #[test]
    fn test_rgb_preserves_table_bytes() {
        let palette = Palette::from_rgb_table(&[12, 34, 56, 200, 100, 0]).unwrap();
        assert_eq!(palette.rgb(0), [12, 34, 56]);
        assert_eq!(palette.rgb(1), [200, 100, 0]);
    }
}
