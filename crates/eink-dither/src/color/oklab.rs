//! Oklab perceptual color space.
//!
//! Björn Ottosson, "A perceptual color space for image processing",
//! <https://bottosson.github.io/posts/oklab/>. Matrices are the 2021-01-25
//! revision.

use super::linear_rgb::LinearRgb;

/// A color in Oklab.
///
/// `l` is lightness (0 black, 1 white); `a` runs green to red and `b` blue
/// to yellow. Components are left unclamped so pixels carrying diffused
/// error can still be matched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklab {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

impl Oklab {
    #[inline]
    pub fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    /// Squared Euclidean distance.
    ///
    /// ```
    /// use eink_dither::Oklab;
    /// let grey = Oklab::new(0.5, 0.0, 0.0);
    /// let d_black = grey.distance_squared(Oklab::new(0.0, 0.0, 0.0));
    /// let d_white = grey.distance_squared(Oklab::new(1.0, 0.0, 0.0));
    /// assert!((d_black - d_white).abs() < 1e-6);
    /// ```
    #[inline]
    pub fn distance_squared(self, other: Oklab) -> f32 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }

    /// Chroma magnitude `sqrt(a² + b²)`.
    #[inline]
    pub fn chroma(self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }
}

impl From<LinearRgb> for Oklab {
    fn from(rgb: LinearRgb) -> Self {
        let l = 0.4122214708 * rgb.r + 0.5363325363 * rgb.g + 0.0514459929 * rgb.b;
        let m = 0.2119034982 * rgb.r + 0.6806995451 * rgb.g + 0.1073969566 * rgb.b;
        let s = 0.0883024619 * rgb.r + 0.2817188376 * rgb.g + 0.6299787005 * rgb.b;

        let l_ = l.cbrt();
        let m_ = m.cbrt();
        let s_ = s.cbrt();

        Oklab {
            l: 0.2104542553 * l_ + 0.7936177850 * m_ - 0.0040720468 * s_,
            a: 1.9779984951 * l_ - 2.4285922050 * m_ + 0.4505937099 * s_,
            b: 0.0259040371 * l_ + 0.7827717662 * m_ - 0.8086757660 * s_,
        }
    }
}
