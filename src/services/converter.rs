use eink_dither::{DistanceMetric, DitherAlgorithm, EinkDitherer};
use image::imageops::{self, FilterType};
use image::{ImageFormat, ImageReader, RgbImage};
use std::io::Cursor;
use std::time::Instant;

use crate::error::ConvertError;
use crate::models::config::{AlgorithmSetting, AppConfig, DistanceSetting};
use crate::models::{CanvasSpec, PaletteTable};
use crate::rendering::encode_preview;

/// Tunables for [`Converter`]
#[derive(Debug, Clone)]
pub struct ConverterOptions {
    pub max_source_bytes: usize,
    pub max_source_pixels: u64,
    pub algorithm: DitherAlgorithm,
    pub serpentine: bool,
    pub error_clamp: f32,
    pub distance: DistanceSetting,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl ConverterOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_source_bytes: config.limits.max_source_bytes,
            max_source_pixels: config.limits.max_source_pixels,
            algorithm: match config.dither.algorithm {
                AlgorithmSetting::FloydSteinberg => DitherAlgorithm::FloydSteinberg,
                AlgorithmSetting::None => DitherAlgorithm::None,
            },
            serpentine: config.dither.serpentine,
            error_clamp: config.dither.error_clamp,
            distance: config.dither.distance,
        }
    }
}

/// Result of one conversion: the quantized raster and its preview
#[derive(Debug, Clone)]
pub struct Conversion {
    /// One palette index per canvas pixel, row-major
    pub indices: Vec<u8>,
    /// Indexed PNG of `indices` through the palette
    pub preview: Vec<u8>,
    pub spec: CanvasSpec,
}

impl Conversion {
    /// Pack the raster into a panel frame
    pub fn pack(&self) -> Vec<u8> {
        eink_dither::pack_nibbles(&self.indices)
    }
}

/// Turns arbitrary image bytes into a palette-constrained canvas raster.
///
/// Every call is independent: the error accumulator lives inside one
/// [`convert`](Self::convert) call, and a failure at any stage returns
/// nothing partial.
#[derive(Debug, Clone)]
pub struct Converter {
    spec: CanvasSpec,
    options: ConverterOptions,
}

impl Converter {
    pub fn new(spec: CanvasSpec, options: ConverterOptions) -> Self {
        Self { spec, options }
    }

    pub fn spec(&self) -> CanvasSpec {
        self.spec
    }

    pub fn convert(&self, source: &[u8], table: &PaletteTable) -> Result<Conversion, ConvertError> {
        let started = Instant::now();

        let canvas = self.normalize(self.decode(source)?);
        let indices = self.quantize(&canvas, table)?;
        let preview = encode_preview(&indices, self.spec, table)?;

        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            preview_bytes = preview.len(),
            "Converted image"
        );

        Ok(Conversion {
            indices,
            preview,
            spec: self.spec,
        })
    }

    /// Decode to 8-bit RGB. Alpha and extra channels are dropped.
    fn decode(&self, source: &[u8]) -> Result<RgbImage, ConvertError> {
        if source.is_empty() {
            return Err(ConvertError::InvalidImage("empty upload".to_string()));
        }
        if source.len() > self.options.max_source_bytes {
            return Err(ConvertError::InvalidImage(format!(
                "upload is {} bytes (max {})",
                source.len(),
                self.options.max_source_bytes
            )));
        }

        let format = image::guess_format(source)
            .map_err(|e| ConvertError::InvalidImage(format!("unrecognized format: {e}")))?;
        if !is_complete(format, source) {
            return Err(ConvertError::InvalidImage(format!(
                "{format:?} stream is truncated"
            )));
        }

        let (width, height) = ImageReader::with_format(Cursor::new(source), format)
            .into_dimensions()
            .map_err(|e| ConvertError::InvalidImage(format!("unreadable header: {e}")))?;
        let pixels = width as u64 * height as u64;
        if pixels == 0 {
            return Err(ConvertError::InvalidImage(format!(
                "image has no pixels ({width}x{height})"
            )));
        }
        if pixels > self.options.max_source_pixels {
            return Err(ConvertError::InvalidImage(format!(
                "image is {width}x{height} ({pixels} pixels, max {})",
                self.options.max_source_pixels
            )));
        }

        let decoded = image::load_from_memory_with_format(source, format)
            .map_err(|e| ConvertError::InvalidImage(format!("decode failed: {e}")))?;

        tracing::debug!(?format, width, height, "Decoded source image");
        Ok(decoded.to_rgb8())
    }

    /// Stretch to the canvas size, ignoring aspect ratio
    fn normalize(&self, image: RgbImage) -> RgbImage {
        if image.dimensions() == (self.spec.width, self.spec.height) {
            return image;
        }
        imageops::resize(
            &image,
            self.spec.width,
            self.spec.height,
            FilterType::CatmullRom,
        )
    }

    fn quantize(&self, canvas: &RgbImage, table: &PaletteTable) -> Result<Vec<u8>, ConvertError> {
        let mut ditherer = EinkDitherer::new(table.to_palette()?)
            .algorithm(self.options.algorithm)
            .serpentine(self.options.serpentine)
            .error_clamp(self.options.error_clamp);
        ditherer = match self.options.distance {
            DistanceSetting::Auto => ditherer,
            DistanceSetting::Euclidean => ditherer.distance_metric(DistanceMetric::Euclidean),
            DistanceSetting::Hyab => ditherer.distance_metric(DistanceMetric::HYAB_DEFAULT),
        };

        let (width, height) = canvas.dimensions();
        let result = ditherer.dither_rgb8(canvas.as_raw(), width as usize, height as usize)?;
        Ok(result.into_indices())
    }
}

/// Structural end-of-stream check. Some decoders fill missing scan data
/// instead of failing, so a cut-off upload has to be caught here.
fn is_complete(format: ImageFormat, source: &[u8]) -> bool {
    let le_u32 = |at: usize| {
        source
            .get(at..at + 4)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as usize)
    };

    match format {
        // EOI, possibly followed by zero padding
        ImageFormat::Jpeg => {
            let end = source.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
            source[..end].ends_with(&[0xFF, 0xD9])
        }
        // IEND chunk: type, then CRC
        ImageFormat::Png => {
            source.len() >= 12 && &source[source.len() - 8..source.len() - 4] == b"IEND"
        }
        ImageFormat::Gif => source.last() == Some(&0x3B),
        // bfSize, or the pixel data offset when an encoder left it at zero
        ImageFormat::Bmp => match (le_u32(2), le_u32(10)) {
            (Some(0), Some(offset)) => source.len() > offset,
            (Some(size), Some(_)) => source.len() >= size,
            _ => false,
        },
        // RIFF payload size excludes the 8-byte RIFF header
        ImageFormat::WebP => le_u32(4).is_some_and(|size| source.len() >= size + 8),
        _ => true,
    }
}
