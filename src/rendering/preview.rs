use std::io::Cursor;

use crate::error::ConvertError;
use crate::models::{CanvasSpec, PaletteTable};

/// Encode quantized indices as an indexed PNG through `table`.
///
/// The bit depth follows the highest index in use: 1, 2, 4 or 8 bits with
/// a PLTE of matching length, so a six-ink frame becomes a 4-bit image.
/// Decoding the PNG yields exactly `table.entry(index)` per pixel.
pub fn encode_preview(
    indices: &[u8],
    spec: CanvasSpec,
    table: &PaletteTable,
) -> Result<Vec<u8>, ConvertError> {
    let max_index = indices.iter().copied().max().unwrap_or(0);
    let (bit_depth, bits) = match max_index {
        0..=1 => (png::BitDepth::One, 1u8),
        2..=3 => (png::BitDepth::Two, 2),
        4..=15 => (png::BitDepth::Four, 4),
        _ => (png::BitDepth::Eight, 8),
    };
    let plte = &table.as_bytes()[..(1usize << bits) * 3];

    let packed = if bits == 8 {
        indices.to_vec()
    } else {
        pack_nbits(indices, spec.width, bits)
    };

    tracing::trace!(bits, max_index, "Encoding preview PNG");
    encode_png(spec, bit_depth, plte, &packed)
}

fn encode_png(
    spec: CanvasSpec,
    bit_depth: png::BitDepth,
    plte: &[u8],
    packed: &[u8],
) -> Result<Vec<u8>, ConvertError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, spec.width, spec.height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_palette(plte);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ConvertError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(packed)
            .map_err(|e| ConvertError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Pack pixel values into N-bit PNG row data (1, 2, or 4 bits per pixel).
/// Rows start on a byte boundary.
fn pack_nbits(indices: &[u8], width: u32, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = (width as usize).div_ceil(pixels_per_byte);
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * (indices.len() / width as usize));

    for row in indices.chunks(width as usize) {
        for group in row.chunks(pixels_per_byte) {
            let mut byte = 0u8;
            for (i, &idx) in group.iter().enumerate() {
                let shift = (8 - bits) - i as u8 * bits;
                byte |= (idx & mask) << shift;
            }
            packed.push(byte);
        }
    }

    packed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(png_bytes: &[u8]) -> (png::OutputInfo, Vec<u8>, Vec<u8>) {
        let mut decoder = png::Decoder::new(Cursor::new(png_bytes));
        decoder.set_transformations(png::Transformations::IDENTITY);
        let mut reader = decoder.read_info().unwrap();
        let plte = reader.info().palette.as_ref().unwrap().to_vec();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        (info, buf, plte)
    }

    fn table() -> PaletteTable {
        PaletteTable::from_bytes(&[
            0, 0, 0, 255, 255, 255, 255, 255, 0, 255, 0, 0, 0, 0, 0, 0, 0, 255, 0, 255, 0,
        ])
    }

    #[test]
    fn test_pack_nbits_row_padding() {
        // 3 pixels at 4 bits: 2 bytes per row, low nibble of the last byte unused
        assert_eq!(pack_nbits(&[1, 2, 3, 4, 5, 6], 3, 4), vec![0x12, 0x30, 0x45, 0x60]);
        assert_eq!(pack_nbits(&[1, 0, 1, 1], 4, 1), vec![0b1011_0000]);
    }

    #[test]
    fn test_six_ink_preview_is_4bit_indexed() {
        let spec = CanvasSpec {
            width: 4,
            height: 2,
        };
        let indices = [0, 1, 2, 3, 5, 6, 1, 0];
        let png_bytes = encode_preview(&indices, spec, &table()).unwrap();

        let (info, data, plte) = decode(&png_bytes);
        assert_eq!(info.width, 4);
        assert_eq!(info.height, 2);
        assert_eq!(info.color_type, png::ColorType::Indexed);
        assert_eq!(info.bit_depth, png::BitDepth::Four);
        assert_eq!(plte.len(), 16 * 3);
        assert_eq!(data, vec![0x01, 0x23, 0x56, 0x10]);
        assert_eq!(&plte[5 * 3..5 * 3 + 3], &[0, 0, 255]);
    }

    #[test]
    fn test_two_level_preview_is_1bit() {
        let spec = CanvasSpec {
            width: 8,
            height: 1,
        };
        let png_bytes = encode_preview(&[1; 8], spec, &table()).unwrap();
        let (info, data, plte) = decode(&png_bytes);
        assert_eq!(info.bit_depth, png::BitDepth::One);
        assert_eq!(data, vec![0xFF]);
        assert_eq!(&plte[3..6], &[255, 255, 255]);
    }

    #[test]
    fn test_high_indices_use_8bit() {
        let spec = CanvasSpec {
            width: 2,
            height: 1,
        };
        let png_bytes = encode_preview(&[0, 200], spec, &table()).unwrap();
        let (info, data, plte) = decode(&png_bytes);
        assert_eq!(info.bit_depth, png::BitDepth::Eight);
        assert_eq!(plte.len(), 768);
        assert_eq!(data, vec![0, 200]);
    }
}
