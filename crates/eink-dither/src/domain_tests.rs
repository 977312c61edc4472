//! Domain-critical regression tests for eink-dither.
//!
//! Each test documents the regression it guards against.

#[cfg(test)]
mod domain_tests {
    use crate::api::EinkDitherer;
    use crate::color::{LinearRgb, Srgb};
    use crate::dither::{Dither, DitherAlgorithm, DitherOptions, FloydSteinberg, NearestColor};
    use crate::output::{pack_nibbles, unpack_nibbles};
    use crate::palette::Palette;

    fn bw() -> Palette {
        Palette::new(&[Srgb::from_u8(0, 0, 0), Srgb::from_u8(255, 255, 255)]).unwrap()
    }

    /// The six inks of a Spectra 6 panel at their controller indices, with
    /// the unused slot 4 and the rest of the 16-entry table zero-filled.
    fn spectra6_padded() -> Palette {
        let mut table = vec![0u8; 16 * 3];
        let inks: [(usize, [u8; 3]); 6] = [
            (0, [0, 0, 0]),
            (1, [255, 255, 255]),
            (2, [255, 255, 0]),
            (3, [255, 0, 0]),
            (5, [0, 0, 255]),
            (6, [0, 255, 0]),
        ];
        for (idx, rgb) in inks {
            table[idx * 3..idx * 3 + 3].copy_from_slice(&rgb);
        }
        Palette::from_rgb_table(&table).unwrap()
    }

    /// If this breaks, it means: error diffusion is running in sRGB instead
    /// of linear light, so mid-tones come out too bright. sRGB 186 is about
    /// linear 0.5 and sRGB 128 about linear 0.214.
    #[test]
    fn test_gamma_correctness_dither_ratios() {
        let palette = bw();
        let options = DitherOptions::new();
        let size = 32;
        let total = size * size;

        let ratio = |level: u8| {
            let image = vec![LinearRgb::from(Srgb::from_u8(level, level, level)); total];
            let result = FloydSteinberg.dither(&image, size, size, &palette, &options);
            result.iter().filter(|&&i| i == 1).count() as f64 / total as f64
        };

        let ratio_186 = ratio(186);
        assert!(
            (ratio_186 - 0.5).abs() < 0.1,
            "REGRESSION: sRGB 186 produced {:.3} white, expected ~0.50",
            ratio_186
        );

        let ratio_128 = ratio(128);
        assert!(
            (ratio_128 - 0.214).abs() < 0.08,
            "REGRESSION: sRGB 128 produced {:.3} white, expected ~0.21",
            ratio_128
        );
    }

    /// If this breaks, it means: zero padding or duplicate entries are being
    /// selected, so the frame would reference inks the panel treats
    /// differently from the first occurrence.
    #[test]
    fn test_padded_entries_never_selected() {
        let palette = spectra6_padded();
        assert_eq!(palette.len(), 16);

        let image: Vec<Srgb> = (0..24 * 24)
            .map(|i| {
                let v = (i % 24) as u8 * 10;
                Srgb::from_u8(v, 255 - v, (i / 24) as u8 * 10)
            })
            .collect();
        let result = EinkDitherer::new(palette).dither(&image, 24, 24).unwrap();

        for &idx in result.indices() {
            assert!(
                matches!(idx, 0 | 1 | 2 | 3 | 5 | 6),
                "REGRESSION: index {} is padding, not an ink",
                idx
            );
        }
    }

    /// If this breaks, it means: perceptual matching is broken and warm
    /// colors drift to unrelated inks.
    #[test]
    fn test_orange_uses_warm_inks() {
        let image = vec![Srgb::from_u8(255, 140, 0); 16 * 16];
        let result = EinkDitherer::new(spectra6_padded())
            .dither(&image, 16, 16)
            .unwrap();
        let indices = result.indices();

        assert!(
            !indices.contains(&5),
            "REGRESSION: orange input mapped to blue"
        );
        assert!(
            indices.contains(&2) || indices.contains(&3),
            "REGRESSION: orange input used neither red nor yellow"
        );
    }

    /// If this breaks, it means: the diffusion loop is not spreading error
    /// and a smooth ramp collapses to flat bands like plain nearest-color.
    #[test]
    fn test_diffusion_breaks_up_gradient_bands() {
        let palette = bw();
        let (w, h) = (64, 8);
        let image: Vec<LinearRgb> = (0..w * h)
            .map(|i| {
                let v = (i % w) as f32 / (w - 1) as f32;
                LinearRgb::new(v, v, v)
            })
            .collect();
        let options = DitherOptions::new();

        let transitions = |row: &[u8]| row.windows(2).filter(|p| p[0] != p[1]).count();

        let plain = NearestColor.dither(&image, w, h, &palette, &options);
        let diffused = FloydSteinberg.dither(&image, w, h, &palette, &options);

        // Nearest-color: one black run then one white run
        assert_eq!(transitions(&plain[..w]), 1);
        assert!(
            transitions(&diffused[..w]) > 4,
            "REGRESSION: diffused gradient row has too few transitions"
        );
    }

    /// If this breaks, it means: the error accumulator leaks across calls,
    /// making identical inputs produce different frames.
    #[test]
    fn test_repeated_calls_are_identical() {
        let ditherer = EinkDitherer::new(spectra6_padded()).algorithm(DitherAlgorithm::FloydSteinberg);
        let image: Vec<Srgb> = (0..32 * 32)
            .map(|i| Srgb::from_u8((i * 7 % 256) as u8, (i * 3 % 256) as u8, (i % 256) as u8))
            .collect();
        let a = ditherer.dither(&image, 32, 32).unwrap();
        let b = ditherer.dither(&image, 32, 32).unwrap();
        assert_eq!(a.indices(), b.indices());
    }

    /// If this breaks, it means: the packed frame no longer carries the
    /// dithered indices, so the panel would show something else than the
    /// preview.
    #[test]
    fn test_packed_frame_matches_indices() {
        let image = vec![Srgb::from_u8(90, 160, 220); 10 * 10];
        let result = EinkDitherer::new(spectra6_padded())
            .dither(&image, 10, 10)
            .unwrap();
        let packed = pack_nibbles(result.indices());
        assert_eq!(packed.len(), 50);
        assert_eq!(unpack_nibbles(&packed), result.indices());
    }

    /// If this breaks, it means: error diffusion blows up numerically on
    /// larger images.
    #[test]
    fn test_large_image_numerical_stability() {
        let palette = bw();
        let (width, height) = (200, 200);
        let total = width * height;

        let image = vec![LinearRgb::from(Srgb::from_u8(128, 128, 128)); total];
        let result = FloydSteinberg.dither(&image, width, height, &palette, &DitherOptions::new());

        assert_eq!(result.len(), total);
        assert!(result.iter().all(|&i| i <= 1));
        let ratio = result.iter().filter(|&&i| i == 1).count() as f64 / total as f64;
        assert!(
            ratio > 0.05 && ratio < 0.95,
            "REGRESSION: 200x200 has {:.3} white ratio",
            ratio
        );
    }
}
